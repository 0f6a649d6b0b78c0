//! TOML configuration.
//!
//! ```toml
//! [dm]
//! length = 14
//! mamode = "rma"
//! talib = true
//! drift = 1
//! offset = 0
//!
//! [output]
//! format = "csv"
//! precision = 6
//! ```
//!
//! Only I/O and TOML syntax errors are reported. Option values are never
//! rejected here; they go through [`RawDmParams::normalize`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::{DmParams, RawDmParams};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown output format: {0} (expected csv, json or parquet)")]
pub struct ParseOutputFormatError(pub String);

/// Output encodings understood by the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Parquet,
}

impl FromStr for OutputFormat {
    type Err = ParseOutputFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "parquet" => Ok(OutputFormat::Parquet),
            _ => Err(ParseOutputFormatError(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Parquet => "parquet",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Decimal places for CSV values.
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            precision: 6,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmConfig {
    pub dm: RawDmParams,
    pub output: OutputConfig,
}

impl DmConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Normalized indicator parameters.
    pub fn params(&self) -> DmParams {
        self.dm.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ma::MaMode;

    #[test]
    fn empty_config_is_default() {
        let cfg = DmConfig::from_toml("").unwrap();
        assert_eq!(cfg, DmConfig::default());
        assert_eq!(cfg.params(), DmParams::default());
        assert_eq!(cfg.output.precision, 6);
    }

    #[test]
    fn full_config_parses() {
        let cfg = DmConfig::from_toml(
            r#"
            [dm]
            length = 10
            mamode = "EMA"
            talib = false
            drift = 2
            offset = 1
            fillna = 0.0
            fill_method = "ffill"

            [output]
            format = "json"
            precision = 3
            "#,
        )
        .unwrap();
        let p = cfg.params();
        assert_eq!(p.length, 10);
        assert_eq!(p.mamode, MaMode::Ema);
        assert!(!p.use_native);
        assert_eq!(p.drift, 2);
        assert_eq!(p.offset, 1);
        assert_eq!(p.fill.value, Some(0.0));
        assert_eq!(cfg.output.format, OutputFormat::Json);
        assert_eq!(cfg.output.precision, 3);
    }

    #[test]
    fn malformed_values_are_not_errors() {
        let cfg = DmConfig::from_toml("[dm]\nlength = -5\ndrift = \"two\"\n").unwrap();
        let p = cfg.params();
        assert_eq!(p.length, 14);
        assert_eq!(p.drift, 1);
    }

    #[test]
    fn syntax_error_is_reported() {
        assert!(matches!(
            DmConfig::from_toml("[dm\nlength = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DmConfig::from_file(Path::new("/no/such/dm.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dm.toml");
        std::fs::write(&path, "[dm]\nlength = 5\n").unwrap();
        assert_eq!(DmConfig::from_file(&path).unwrap().params().length, 5);
    }

    #[test]
    fn output_format_parses() {
        assert_eq!("Parquet".parse::<OutputFormat>(), Ok(OutputFormat::Parquet));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
