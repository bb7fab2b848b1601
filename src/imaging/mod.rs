//! # Image Collaborators
//!
//! File loading/saving and quality metrics around the core pipeline. Nothing here
//! touches the embedded payload.

pub mod io;
pub mod metrics;

pub use io::{downscale, load_all, load_rgb, save_image};
pub use metrics::{compare, QualityReport};
