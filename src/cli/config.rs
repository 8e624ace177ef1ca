//! TOML configuration file support.
//!
//! Thresholds shared across many runs can live in a config file instead of
//! being repeated on every command line:
//!
//! ```toml
//! # mzrecal.toml
//! [calibration]
//! min_score = 8.0
//! min_precursors = 100
//! ms2_error_bound = 25.0
//! prefix = "batch_07"
//! plot = true
//! ```
//!
//! Explicit command line flags take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure for mzrecal.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Calibration settings.
    #[serde(default)]
    pub calibration: CalibrationConfig,
}

/// Configuration for error estimation and outputs.
#[derive(Debug, Default, Deserialize)]
pub struct CalibrationConfig {
    /// Minimum match score (exclusive).
    pub min_score: Option<f64>,

    /// Minimum number of admissible precursors.
    pub min_precursors: Option<usize>,

    /// Half-width of the fragment error window in ppm.
    pub ms2_error_bound: Option<f64>,

    /// Sample label for the report and plot file names.
    pub prefix: Option<String>,

    /// Draw error distribution plots.
    pub plot: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
