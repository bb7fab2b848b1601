//! # Carrier Decoder
//!
//! Reads every full channel group of a carrier back into bytes, then stitches the
//! per-carrier results into the serialized stream.

use image::RgbImage;
use log::debug;

use super::bitcodec::{self, GROUP_LEN};
use crate::common::error::{Result, StegoError};

/// Bytes recovered from one carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// One byte per full group, covering the whole carrier
    pub bytes: Vec<u8>,
    /// Index of the first group whose marker is set
    pub terminator: Option<usize>,
}

/// Decode all groups of `carrier`. Does not stop at a marker.
pub fn extract(carrier: &RgbImage) -> Extraction {
    let mut terminator = None;
    let bytes = carrier
        .as_raw()
        .chunks_exact(GROUP_LEN)
        .enumerate()
        .map(|(i, group)| {
            let (byte, last) = bitcodec::decode_group(group);
            if last && terminator.is_none() {
                terminator = Some(i);
            }
            byte
        })
        .collect();

    Extraction { bytes, terminator }
}

/// Concatenate extractions in carrier order and cut the result after the first byte
/// carrying the stop marker.
///
/// # Errors
/// [`StegoError::Format`] if no carrier holds a stop marker.
pub fn assemble<I>(extractions: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = Extraction>,
{
    let mut stream = Vec::new();

    for (carrier, extraction) in extractions.into_iter().enumerate() {
        match extraction.terminator {
            Some(at) => {
                stream.extend_from_slice(&extraction.bytes[..=at]);
                debug!(
                    "Stop marker found in carrier {} at group {}; stream is {} bytes",
                    carrier,
                    at,
                    stream.len()
                );
                return Ok(stream);
            }
            None => stream.extend_from_slice(&extraction.bytes),
        }
    }

    Err(StegoError::format(
        stream.len(),
        "no end-of-stream marker found in any carrier",
    ))
}

/// Extract carriers one at a time, skipping those after the one holding the marker.
pub fn decode_all(carriers: &[RgbImage]) -> Result<Vec<u8>> {
    let mut done = false;
    let extractions = carriers.iter().map_while(|carrier| {
        if done {
            return None;
        }
        let extraction = extract(carrier);
        done = extraction.terminator.is_some();
        Some(extraction)
    });
    assemble(extractions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::encoder::embed;

    fn even_carrier(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, image::Rgb([100, 120, 140]))
    }

    #[test]
    fn test_extract_reads_whole_carrier() {
        let encoded = embed(0, &even_carrier(9, 1), b"ok", true).unwrap();
        let extraction = extract(&encoded);

        assert_eq!(extraction.bytes.len(), 3);
        assert_eq!(&extraction.bytes[..2], b"ok");
        assert_eq!(extraction.terminator, Some(1));
    }

    #[test]
    fn test_assemble_truncates_at_marker() {
        let first = Extraction {
            bytes: vec![1, 2, 3],
            terminator: None,
        };
        let second = Extraction {
            bytes: vec![4, 5, 6, 7],
            terminator: Some(1),
        };
        let third = Extraction {
            bytes: vec![8],
            terminator: Some(0),
        };

        assert_eq!(assemble(vec![first, second, third]).unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_missing_marker() {
        let carriers = vec![even_carrier(3, 3), even_carrier(6, 6)];
        assert!(matches!(
            decode_all(&carriers),
            Err(StegoError::Format { offset: 15, .. })
        ));
    }

    #[test]
    fn test_decode_all_spans_carriers() {
        let a = embed(0, &even_carrier(3, 2), &[10, 20], false).unwrap();
        let b = embed(1, &even_carrier(6, 1), &[30], true).unwrap();
        assert_eq!(decode_all(&[a, b]).unwrap(), vec![10, 20, 30]);
    }
}
