//! # Quality Metrics
//!
//! Compares an original image with its encoded (or recovered) counterpart.
//!
//! - **MSE**: mean of squared channel differences
//! - **PSNR**: `20 * log10(255 / sqrt(MSE))` dB, infinite for identical images
//! - **Accuracy**: percentage of channel values that match exactly
//!
//! Reports are exported to JSON for offline analysis.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::common::error::{Result, StegoError};

const MAX_CHANNEL: f64 = 255.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub mse: f64,
    /// `None` when the images are identical (infinite PSNR)
    pub psnr_db: Option<f64>,
    pub accuracy: f64,
}

/// Compute MSE, PSNR and accuracy between two equally sized images.
pub fn compare(original: &RgbImage, modified: &RgbImage) -> Result<QualityReport> {
    if original.dimensions() != modified.dimensions() {
        return Err(StegoError::DimensionMismatch {
            left: original.dimensions(),
            right: modified.dimensions(),
        });
    }

    let total = original.as_raw().len();
    if total == 0 {
        return Ok(QualityReport {
            mse: 0.0,
            psnr_db: None,
            accuracy: 100.0,
        });
    }

    let (squared, matching) = original
        .as_raw()
        .iter()
        .zip(modified.as_raw())
        .fold((0u64, 0usize), |(sq, eq), (&a, &b)| {
            let diff = a.abs_diff(b) as u64;
            (sq + diff * diff, eq + (a == b) as usize)
        });

    let mse = squared as f64 / total as f64;
    let psnr_db = (mse > 0.0).then(|| 20.0 * (MAX_CHANNEL / mse.sqrt()).log10());

    Ok(QualityReport {
        mse,
        psnr_db,
        accuracy: matching as f64 / total as f64 * 100.0,
    })
}

impl std::fmt::Display for QualityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MSE: {:.4}, PSNR: ", self.mse)?;
        match self.psnr_db {
            Some(psnr) => write!(f, "{:.2} dB", psnr)?,
            None => write!(f, "inf dB")?,
        }
        write!(f, ", Accuracy: {:.2}%", self.accuracy)
    }
}

/// Quality of one encode run, one entry per carrier.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MetricsReport {
    pub carriers: Vec<CarrierQuality>,
    pub hidden_images: usize,
    pub payload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierQuality {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub capacity_bytes: usize,
    pub quality: QualityReport,
}

impl MetricsReport {
    pub fn export_to_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let output = serde_json::json!({
            "generated_at": chrono::Local::now().to_rfc3339(),
            "report": self,
        });

        let json_string = serde_json::to_string_pretty(&output)?;
        let mut file = File::create(path)?;
        file.write_all(json_string.as_bytes())?;

        Ok(())
    }
}
