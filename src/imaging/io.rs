//! Image file input and output.
//!
//! Everything the pipeline sees is 8-bit RGB; conversion happens here on load.

use image::imageops::{self, FilterType};
use image::RgbImage;
use log::debug;
use std::path::Path;

use crate::common::error::Result;

/// Open any raster format the `image` crate understands and convert it to RGB8.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage> {
    let path = path.as_ref();
    let img = image::open(path)?.to_rgb8();
    debug!(
        "Loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img)
}

/// Load several images, preserving order.
pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<RgbImage>> {
    paths.iter().map(load_rgb).collect()
}

/// Write `img`, picking the format from the file extension.
///
/// Lossy formats destroy the embedded parity bits; callers choose PNG for carriers.
pub fn save_image(img: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    img.save(path)?;
    debug!("Saved {}", path.display());
    Ok(())
}

/// Shrink `img` by an integer `factor` using Lanczos3, never below 1x1.
///
/// A factor of 0 or 1 returns the image unchanged.
pub fn downscale(img: &RgbImage, factor: u32) -> RgbImage {
    if factor <= 1 {
        return img.clone();
    }
    let width = (img.width() / factor).max(1);
    let height = (img.height() / factor).max(1);
    imageops::resize(img, width, height, FilterType::Lanczos3)
}
