//! # Carrier Encoder
//!
//! Embeds one chunk into a copy of one carrier. The input carrier is never modified,
//! which lets independent carriers be encoded on separate threads.

use image::RgbImage;

use super::bitcodec::{self, GROUP_LEN};
use crate::common::error::{Result, StegoError};

/// Return a copy of `carrier` with `chunk` embedded in its leading channel groups.
///
/// `terminal` must be true only when the chunk ends with the last byte of the whole
/// stream; that byte's group then gets the stop marker. Channel values past the
/// chunk's groups are copied unchanged.
///
/// # Errors
/// [`StegoError::EmbedOverflow`] if the chunk needs more groups than the carrier has.
pub fn embed(
    carrier_index: usize,
    carrier: &RgbImage,
    chunk: &[u8],
    terminal: bool,
) -> Result<RgbImage> {
    let capacity = bitcodec::capacity(carrier.width(), carrier.height());
    if chunk.len() > capacity {
        return Err(StegoError::EmbedOverflow {
            carrier: carrier_index,
            chunk_len: chunk.len(),
            capacity,
        });
    }

    let mut encoded = carrier.clone();
    let channels: &mut [u8] = &mut encoded;
    let last = chunk.len().checked_sub(1);

    for (i, (group, &byte)) in channels
        .chunks_exact_mut(GROUP_LEN)
        .zip(chunk)
        .enumerate()
    {
        bitcodec::encode_group(group, byte, terminal && Some(i) == last);
    }

    Ok(encoded)
}
