//! # Configuration
//!
//! Optional YAML file with the data directory, log level and calculator
//! constants. Every field has a default, so a missing file or a partial file
//! is fine.
//!
//! ```yaml
//! data_directory: "/home/me/.local/share/Catculator"
//! log_level: "debug"
//! calculator:
//!   pouch_grams: 85.0
//!   default_wet_food_calories: 80.0
//!   default_dry_food_calories_per_kg: 3500.0
//!   max_weight_kg: 45.0
//! ```

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use shared::CalculatorConfig;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::JsonConnection;

/// Default config file name inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where profile data lives; platform data directory if unset
    pub data_directory: Option<PathBuf>,
    /// Default log filter, overridden by RUST_LOG
    pub log_level: String,
    /// Keep profiles in memory only
    pub in_memory: bool,
    pub calculator: CalculatorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: None,
            log_level: "info".to_string(),
            in_memory: false,
            calculator: CalculatorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config from a YAML file, falling back to defaults if the file doesn't exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let yaml_content = serde_yaml::to_string(self)?;

        // Atomic write using temp file
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to move {} into place", temp_path.display()))?;

        debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject calculator constants that would break the arithmetic
    pub fn validate(&self) -> Result<()> {
        let calculator = &self.calculator;

        if !(calculator.pouch_grams.is_finite() && calculator.pouch_grams > 0.0) {
            anyhow::bail!("calculator.pouch_grams must be positive");
        }
        if !(calculator.max_weight_kg.is_finite() && calculator.max_weight_kg > 0.0) {
            anyhow::bail!("calculator.max_weight_kg must be positive");
        }
        if !(calculator.small_cat_threshold_kg.is_finite() && calculator.small_cat_threshold_kg > 0.0) {
            anyhow::bail!("calculator.small_cat_threshold_kg must be positive");
        }
        if calculator.default_pouches == 0 {
            anyhow::bail!("calculator.default_pouches must be at least 1");
        }

        Ok(())
    }

    pub fn resolved_data_directory(&self) -> PathBuf {
        self.data_directory
            .clone()
            .unwrap_or_else(JsonConnection::default_directory)
    }
}
