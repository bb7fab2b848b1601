//! # Payload Framing
//!
//! Serializes hidden images into one self-describing byte stream and parses it back.
//!
//! ## Wire Format
//!
//! ```text
//! "{w}x{h}$$IMG{i}$$" <w*h*3 RGB bytes>   repeated for i = 0..N-1
//! "$$END$$"
//! ```
//!
//! Dimensions and index are ASCII decimal with no leading zeros. The parser walks the
//! buffer with an explicit cursor: a header is located by its `$$IMG` tag, the pixel
//! block after it is taken by declared length, and the scan stops when no tag remains.

use image::RgbImage;
use log::debug;

use crate::common::error::{Result, StegoError};

const IMG_TAG: &[u8] = b"$$IMG";
const DELIMITER: &[u8] = b"$$";
/// Terminates every serialized stream.
pub const END_TOKEN: &[u8] = b"$$END$$";

/// Header token announcing image `index`.
fn header(width: u32, height: u32, index: usize) -> String {
    format!("{}x{}$$IMG{}$$", width, height, index)
}

/// Bytes [`serialize`] will produce for `images`.
pub fn serialized_len(images: &[RgbImage]) -> usize {
    images
        .iter()
        .enumerate()
        .map(|(i, img)| header(img.width(), img.height(), i).len() + img.as_raw().len())
        .sum::<usize>()
        + END_TOKEN.len()
}

/// Frame `images` (in order) into a single stream.
///
/// # Errors
/// [`StegoError::Format`] if any image has a zero width or height.
pub fn serialize(images: &[RgbImage]) -> Result<Vec<u8>> {
    let mut stream = Vec::with_capacity(serialized_len(images));

    for (index, img) in images.iter().enumerate() {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(StegoError::format(
                stream.len(),
                format!("hidden image {} has empty dimensions {}x{}", index, width, height),
            ));
        }

        stream.extend_from_slice(header(width, height, index).as_bytes());
        stream.extend_from_slice(img.as_raw());
    }

    stream.extend_from_slice(END_TOKEN);
    debug!("Framed {} image(s) into {} bytes", images.len(), stream.len());
    Ok(stream)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Parse a non-empty run of ASCII digits. `str::parse` alone would accept a `+` sign.
fn parse_decimal(bytes: &[u8]) -> Option<usize> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

fn parse_dimensions(token: &[u8], offset: usize) -> Result<(u32, u32)> {
    let bad = || {
        StegoError::format(
            offset,
            format!(
                "expected '{{width}}x{{height}}', found {:?}",
                String::from_utf8_lossy(token)
            ),
        )
    };

    let split = token.iter().position(|&b| b == b'x').ok_or_else(bad)?;
    let width = parse_decimal(&token[..split]).ok_or_else(bad)?;
    let height = parse_decimal(&token[split + 1..]).ok_or_else(bad)?;
    let width = u32::try_from(width).map_err(|_| bad())?;
    let height = u32::try_from(height).map_err(|_| bad())?;

    if width == 0 || height == 0 {
        return Err(StegoError::format(
            offset,
            format!("zero-sized image {}x{}", width, height),
        ));
    }
    Ok((width, height))
}

/// Recover the hidden images from a stream produced by [`serialize`].
///
/// # Errors
/// - [`StegoError::Format`]: unparseable dimensions or index, an index out of
///   sequence, or a stream that does not end with the end token
/// - [`StegoError::TruncatedStream`]: fewer pixel bytes remain than a header declares
pub fn deserialize(stream: &[u8]) -> Result<Vec<RgbImage>> {
    let mut images = Vec::new();
    let mut cursor = 0;

    while let Some(tag_at) = find(&stream[cursor..], IMG_TAG) {
        let index = images.len();
        let tag_at = cursor + tag_at;
        let (width, height) = parse_dimensions(&stream[cursor..tag_at], cursor)?;

        let index_at = tag_at + IMG_TAG.len();
        let index_len = find(&stream[index_at..], DELIMITER).ok_or_else(|| {
            StegoError::format(index_at, "image index is not closed by '$$'")
        })?;
        let declared = parse_decimal(&stream[index_at..index_at + index_len])
            .ok_or_else(|| StegoError::format(index_at, "image index is not a decimal number"))?;
        if declared != index {
            return Err(StegoError::format(
                index_at,
                format!("expected image index {}, found {}", index, declared),
            ));
        }

        let pixels_at = index_at + index_len + DELIMITER.len();
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| StegoError::format(cursor, "image dimensions overflow"))?;
        let available = stream.len() - pixels_at;
        if available < expected {
            return Err(StegoError::TruncatedStream {
                index,
                expected,
                available,
            });
        }

        let pixels = stream[pixels_at..pixels_at + expected].to_vec();
        let img = RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| StegoError::format(pixels_at, "pixel buffer does not match dimensions"))?;
        debug!("Parsed hidden image {} ({}x{})", index, width, height);
        images.push(img);

        cursor = pixels_at + expected;
    }

    if !stream[cursor..].starts_with(END_TOKEN) {
        return Err(StegoError::format(cursor, "missing '$$END$$' terminator"));
    }

    Ok(images)
}
