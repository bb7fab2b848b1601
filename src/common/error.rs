//! # Error Taxonomy
//!
//! Every fallible operation in the library returns [`StegoError`]. Binaries wrap it
//! in `anyhow::Error` for presentation.

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, StegoError>;

/// Errors raised while encoding into or decoding from carrier images.
#[derive(Debug, Error)]
pub enum StegoError {
    /// The serialized stream does not fit into the combined carrier capacity.
    #[error(
        "not enough carrier capacity: need {required} bytes but only {available} available (short by {})",
        .required - .available
    )]
    Capacity { required: usize, available: usize },

    /// A chunk was handed to a carrier that cannot hold it.
    #[error("carrier {carrier} cannot hold a {chunk_len} byte chunk (capacity {capacity} bytes)")]
    EmbedOverflow {
        carrier: usize,
        chunk_len: usize,
        capacity: usize,
    },

    /// A metadata token or the stream terminator could not be parsed.
    #[error("malformed payload at offset {offset}: {reason}")]
    Format { offset: usize, reason: String },

    /// A metadata token declared more pixel bytes than the stream still holds.
    #[error("truncated stream: image {index} needs {expected} pixel bytes but only {available} remain")]
    TruncatedStream {
        index: usize,
        expected: usize,
        available: usize,
    },

    /// Two images that must share a shape do not.
    #[error("dimension mismatch: {left:?} vs {right:?}")]
    DimensionMismatch { left: (u32, u32), right: (u32, u32) },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A concurrent carrier unit panicked or was cancelled.
    #[error("worker failed: {0}")]
    Worker(String),
}

impl StegoError {
    pub(crate) fn format(offset: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            offset,
            reason: reason.into(),
        }
    }

    /// Bytes missing for a plan-time capacity failure, `None` for other errors.
    pub fn shortfall(&self) -> Option<usize> {
        match self {
            Self::Capacity {
                required,
                available,
            } => Some(required - available),
            _ => None,
        }
    }

    /// True for both plan-time and embed-time capacity failures.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::Capacity { .. } | Self::EmbedOverflow { .. })
    }
}
