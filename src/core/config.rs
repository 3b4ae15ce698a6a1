//! Run configuration
//!
//! A run file has two sections: `[simulation]` holds everything the grid and
//! the loop consume, `[output]` holds what the frame, animation and text-log
//! writers consume. Every field has a default so a partial file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::error::SimError;
use crate::core::types::{EdgePolicy, RelocationPolicy, StallPolicy, ThresholdPolicy};

/// Parameters of the grid and the relocation loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Side length of the square grid
    pub size: usize,

    /// Probability that a cell starts as `TypeA`
    pub white_rate: f64,

    /// Probability that a cell starts as `TypeB`
    ///
    /// Whatever remains after `white_rate + black_rate` starts empty.
    pub black_rate: f64,

    /// Same-type neighbors an occupied cell needs to be content
    pub happiness_cup: u32,

    /// Tick budget for the loop
    pub iterations: u64,

    /// A snapshot is produced every `snapshot_interval` ticks
    pub snapshot_interval: u64,

    /// RNG seed; a random seed is drawn when absent
    pub seed: Option<u64>,

    pub threshold: ThresholdPolicy,
    pub edges: EdgePolicy,
    pub relocation: RelocationPolicy,
    pub on_stall: StallPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            size: 50,
            white_rate: 0.4,
            black_rate: 0.4,
            happiness_cup: 3,
            iterations: 1000,
            snapshot_interval: 10,
            seed: None,
            threshold: ThresholdPolicy::default(),
            edges: EdgePolicy::default(),
            relocation: RelocationPolicy::default(),
            on_stall: StallPolicy::default(),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject parameter combinations the grid cannot be built from
    pub fn validate(&self) -> Result<(), SimError> {
        if self.size == 0 {
            return Err(SimError::config("size must be positive"));
        }
        cell_count(self.size)?;
        if self.happiness_cup == 0 {
            return Err(SimError::config("happiness_cup must be positive"));
        }
        if self.snapshot_interval == 0 {
            return Err(SimError::config("snapshot_interval must be positive"));
        }
        validate_rates(self.white_rate, self.black_rate)
    }
}

/// Number of cells in a grid of side `size`, rejecting overflow
pub(crate) fn cell_count(size: usize) -> Result<usize, SimError> {
    size.checked_mul(size).ok_or_else(|| {
        SimError::config(format!("size {} is too large for a square grid", size))
    })
}

/// Rates must be finite probabilities whose sum does not exceed 1
pub(crate) fn validate_rates(white_rate: f64, black_rate: f64) -> Result<(), SimError> {
    for (name, rate) in [("white_rate", white_rate), ("black_rate", black_rate)] {
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(SimError::config(format!(
                "{} ({}) must be within [0, 1]",
                name, rate
            )));
        }
    }
    if white_rate + black_rate > 1.0 {
        return Err(SimError::config(format!(
            "white_rate + black_rate ({}) must not exceed 1",
            white_rate + black_rate
        )));
    }
    Ok(())
}

/// RGBA fill used for each cell state in rendered frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub empty: [u8; 4],
    pub type_a: [u8; 4],
    pub type_b: [u8; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            empty: [128, 128, 128, 255],
            type_a: [255, 255, 255, 255],
            type_b: [0, 0, 0, 255],
        }
    }
}

/// Parameters of the snapshot consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub generate_images: bool,
    pub generate_gif: bool,
    pub write_text_logs: bool,

    /// Directory that receives one PNG per snapshot (recreated each run)
    pub frames_dir: PathBuf,
    pub gif_path: PathBuf,

    /// Text log file name, placed inside `frames_dir`
    pub cells_log: String,

    /// Side of a rendered frame in pixels
    pub plot_size: u32,

    pub frame_delay_ms: u32,
    pub colors: Palette,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            generate_images: true,
            generate_gif: true,
            write_text_logs: false,
            frames_dir: PathBuf::from("frames"),
            gif_path: PathBuf::from("schelling.gif"),
            cells_log: "cells.txt".to_string(),
            plot_size: 500,
            frame_delay_ms: 100,
            colors: Palette::default(),
        }
    }
}

impl OutputConfig {
    pub fn cells_log_path(&self) -> PathBuf {
        self.frames_dir.join(&self.cells_log)
    }
}

/// Whole run file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub simulation: SimulationConfig,
    pub output: OutputConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] SimError),
}

impl RunConfig {
    /// Parse TOML text and validate the simulation section
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(content)?;
        config.simulation.validate()?;
        Ok(config)
    }

    /// Parse JSON text and validate the simulation section
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = serde_json::from_str(content)?;
        config.simulation.validate()?;
        Ok(config)
    }

    /// Load a run file; `.json` is parsed as JSON, anything else as TOML
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rates_over_one_rejected() {
        let config = SimulationConfig {
            white_rate: 0.7,
            black_rate: 0.4,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SimError::Configuration(_))));
    }

    #[test]
    fn test_negative_rate_rejected() {
        assert!(validate_rates(-0.1, 0.5).is_err());
        assert!(validate_rates(f64::NAN, 0.5).is_err());
        assert!(validate_rates(1.0, 0.0).is_ok());
    }

    #[test]
    fn test_zero_size_and_cup_rejected() {
        let zero_size = SimulationConfig {
            size: 0,
            ..Default::default()
        };
        assert!(zero_size.validate().is_err());

        let zero_cup = SimulationConfig {
            happiness_cup: 0,
            ..Default::default()
        };
        assert!(zero_cup.validate().is_err());
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let config = SimulationConfig {
            size: usize::MAX,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SimError::Configuration(_))));
        assert_eq!(cell_count(7).unwrap(), 49);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RunConfig::from_toml_str(
            r#"
            [simulation]
            size = 20
            happiness_cup = 2
            threshold = "exceeds"

            [output]
            generate_gif = false
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.size, 20);
        assert_eq!(config.simulation.threshold, ThresholdPolicy::Exceeds);
        assert_eq!(config.simulation.white_rate, 0.4);
        assert!(!config.output.generate_gif);
        assert_eq!(config.output.plot_size, 500);
    }

    #[test]
    fn test_sample_run_file_parses() {
        let config = RunConfig::from_toml_str(include_str!("../../config.toml")).unwrap();
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.relocation, RelocationPolicy::Swap);
        assert_eq!(config.output.colors, Palette::default());
    }

    #[test]
    fn test_json_config() {
        let config = RunConfig::from_json_str(
            r#"{"simulation": {"size": 8, "seed": 7}, "output": {"write_text_logs": true}}"#,
        )
        .unwrap();
        assert_eq!(config.simulation.seed, Some(7));
        assert!(config.output.write_text_logs);
    }

    #[test]
    fn test_invalid_file_content_is_reported() {
        let err = RunConfig::from_toml_str("[simulation]\nwhite_rate = 0.9\nblack_rate = 0.9\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(SimError::Configuration(_))));
    }
}
