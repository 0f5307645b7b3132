//! Configuration file.
//!
//! Optional TOML file. Every field has a default, so a missing file or a file
//! that sets only a few keys is fine. Lookup order: `--config <path>`, then
//! `./padspan.toml`, then built-in defaults.

use crate::analyzer::{
    AnalyzerConfig, ExtentStrategy, FilterMode, DEFAULT_PEAK_THRESHOLD_PERCENT, DEFAULT_SIGMA,
};
use crate::error::{Error, Result};
use crate::recorder::{UnavailablePolicy, DEFAULT_POLLING_HZ};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "padspan.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recording: RecordingConfig,
    pub analysis: AnalysisConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Pointer polls per second.
    pub polling_hz: u32,
    /// What to record when the pointer cannot be read.
    pub on_unavailable: UnavailablePolicy,
    /// Ask for Enter before recording starts.
    pub wait_for_enter: bool,
    /// Seconds counted down after Enter, before the first sample.
    pub countdown_secs: u32,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            polling_hz: DEFAULT_POLLING_HZ,
            on_unavailable: UnavailablePolicy::Sentinel,
            wait_for_enter: true,
            countdown_secs: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    BoundingBox,
    PeakNearExtremes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub filter: FilterMode,
    pub strategy: StrategyKind,
    /// Peak search band, percent of the value range.
    pub threshold_percent: f64,
    pub derotate: bool,
    /// Outlier band half-width in standard deviations.
    pub sigma: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            filter: FilterMode::Paired,
            strategy: StrategyKind::BoundingBox,
            threshold_percent: DEFAULT_PEAK_THRESHOLD_PERCENT,
            derotate: true,
            sigma: DEFAULT_SIGMA,
        }
    }
}

impl AnalysisConfig {
    pub fn extent_strategy(&self) -> ExtentStrategy {
        match self.strategy {
            StrategyKind::BoundingBox => ExtentStrategy::BoundingBox,
            StrategyKind::PeakNearExtremes => ExtentStrategy::PeakNearExtremes {
                threshold_percent: self.threshold_percent,
            },
        }
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            filter: self.filter,
            strategy: self.extent_strategy(),
            derotate: self.derotate,
            sigma: self.sigma,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Extra `{"tablets": [...]}` inventory merged into the built-in catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<PathBuf>,
    /// Brand the inventory's models are listed under.
    pub inventory_brand: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            inventory: None,
            inventory_brand: "Custom".to_string(),
        }
    }
}

impl Config {
    /// Returns the first out-of-range field as an error.
    pub fn validate(&self) -> Result<()> {
        if !(1..=1000).contains(&self.recording.polling_hz) {
            return Err(Error::Config(format!(
                "polling_hz must be in [1, 1000], got {}",
                self.recording.polling_hz
            )));
        }
        if !(self.analysis.threshold_percent > 0.0 && self.analysis.threshold_percent <= 50.0) {
            return Err(Error::Config(format!(
                "threshold_percent must be in (0, 50], got {}",
                self.analysis.threshold_percent
            )));
        }
        if !(self.analysis.sigma.is_finite() && self.analysis.sigma > 0.0) {
            return Err(Error::Config(format!(
                "sigma must be > 0, got {}",
                self.analysis.sigma
            )));
        }
        if self.catalog.inventory_brand.trim().is_empty() {
            return Err(Error::Config("inventory_brand must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// `./padspan.toml` if present, otherwise defaults.
    pub fn load_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
