//! # Chunk Planner
//!
//! Splits a serialized stream across an ordered list of carriers. Carriers are filled
//! greedily in order, so every carrier before the last used one is filled to capacity.

use log::debug;

use crate::common::error::{Result, StegoError};

/// The contiguous slice of the stream assigned to one carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Position of the carrier in the caller's list
    pub carrier: usize,
    /// Offset of the first byte within the whole stream
    pub offset: usize,
    pub bytes: &'a [u8],
    /// Whether this chunk ends with the last byte of the whole stream
    pub terminal: bool,
}

impl Chunk<'_> {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Assign `stream` to carriers with the given byte capacities.
///
/// Returns exactly one chunk per carrier, in carrier order. Carriers past the end of
/// the stream receive empty chunks.
///
/// # Errors
/// [`StegoError::Capacity`] if the capacities sum to less than the stream length.
pub fn split<'a>(stream: &'a [u8], capacities: &[usize]) -> Result<Vec<Chunk<'a>>> {
    let available: usize = capacities.iter().sum();
    if available < stream.len() {
        return Err(StegoError::Capacity {
            required: stream.len(),
            available,
        });
    }

    let mut offset = 0;
    let chunks = capacities
        .iter()
        .enumerate()
        .map(|(carrier, &capacity)| {
            let take = capacity.min(stream.len() - offset);
            let bytes = &stream[offset..offset + take];
            let chunk = Chunk {
                carrier,
                offset,
                bytes,
                terminal: take > 0 && offset + take == stream.len(),
            };
            offset += take;
            debug!(
                "Carrier {} assigned {} of {} bytes (capacity {})",
                carrier,
                take,
                stream.len(),
                capacity
            );
            chunk
        })
        .collect();

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fills_in_order() {
        let stream: Vec<u8> = (0..1000).map(|i| i as u8).collect();
        let chunks = split(&stream, &[300, 300, 500]).unwrap();

        let lens: Vec<usize> = chunks.iter().map(Chunk::len).collect();
        assert_eq!(lens, vec![300, 300, 400]);
        assert_eq!(chunks[1].offset, 300);
        assert_eq!(chunks[2].bytes, &stream[600..]);
        assert_eq!(
            chunks.iter().map(|c| c.terminal).collect::<Vec<_>>(),
            vec![false, false, true]
        );
    }

    #[test]
    fn test_split_reports_shortfall() {
        let stream = vec![0u8; 1000];
        let err = split(&stream, &[300, 300, 300]).unwrap_err();
        assert_eq!(err.shortfall(), Some(100));
    }

    #[test]
    fn test_unused_carriers_get_empty_chunks() {
        let stream = vec![7u8; 10];
        let chunks = split(&stream, &[50, 50]).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 10);
        assert!(chunks[0].terminal);
        assert!(chunks[1].is_empty());
        assert!(!chunks[1].terminal);
        assert_eq!(chunks[1].offset, 10);
    }

    #[test]
    fn test_zero_capacity_carrier_is_skipped() {
        let stream = vec![1u8; 8];
        let chunks = split(&stream, &[0, 5, 3]).unwrap();
        let lens: Vec<usize> = chunks.iter().map(Chunk::len).collect();
        assert_eq!(lens, vec![0, 5, 3]);
        assert!(chunks[2].terminal);
    }

    #[test]
    fn test_exact_fit() {
        let stream = vec![1u8; 600];
        assert!(split(&stream, &[300, 300]).is_ok());
        assert!(split(&stream, &[300, 299]).is_err());
    }
}
