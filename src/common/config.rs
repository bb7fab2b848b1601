//! # Configuration Utilities
//!
//! TOML configuration for the `stego` binary. Every field has a default, so a
//! missing file or a partial file is fine.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: StegoConfig = load_config("config/stego.toml")?;
/// ```
pub fn load_config<T>(path: impl AsRef<Path>) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete configuration for an encode or decode run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    pub pipeline: PipelineConfig,
    pub hidden: HiddenConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Carrier processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Carriers embedded or extracted at once. 0 runs everything on the calling thread.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

/// Preprocessing applied to hidden images before they are framed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HiddenConfig {
    /// Integer divisor for width and height (1 keeps the original size)
    pub downscale: u32,
}

impl Default for HiddenConfig {
    fn default() -> Self {
        Self { downscale: 1 }
    }
}

/// Where and how output images are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
    pub encoded_prefix: String,
    pub decoded_prefix: String,
    /// File extension; must name a lossless format or the hidden bits are destroyed
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            encoded_prefix: "encoded_image_".to_string(),
            decoded_prefix: "decoded_hidden_image_".to_string(),
            format: "png".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of off, error, warn, info, debug, trace
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl OutputConfig {
    /// Path of the `index`-th (zero-based) encoded carrier. File names are 1-based.
    pub fn encoded_path(&self, index: usize) -> std::path::PathBuf {
        Path::new(&self.directory).join(format!(
            "{}{}.{}",
            self.encoded_prefix,
            index + 1,
            self.format
        ))
    }

    /// Path of the `index`-th (zero-based) recovered hidden image.
    pub fn decoded_path(&self, index: usize) -> std::path::PathBuf {
        Path::new(&self.directory).join(format!(
            "{}{}.{}",
            self.decoded_prefix,
            index + 1,
            self.format
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: StegoConfig = toml::from_str(
            r#"
            [pipeline]
            workers = 8

            [output]
            directory = "out"
            "#,
        )
        .unwrap();

        assert_eq!(config.pipeline.workers, 8);
        assert_eq!(config.hidden.downscale, 1);
        assert_eq!(config.output.directory, "out");
        assert_eq!(config.output.encoded_prefix, "encoded_image_");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[hidden]\ndownscale = 2").unwrap();

        let config: StegoConfig = load_config(file.path()).unwrap();
        assert_eq!(config.hidden.downscale, 2);
        assert_eq!(config.pipeline.workers, 4);
    }

    #[test]
    fn test_output_paths_are_one_based() {
        let output = OutputConfig {
            directory: "dist".to_string(),
            ..OutputConfig::default()
        };
        assert_eq!(
            output.encoded_path(0),
            Path::new("dist").join("encoded_image_1.png")
        );
        assert_eq!(
            output.decoded_path(3),
            Path::new("dist").join("decoded_hidden_image_4.png")
        );
    }
}
