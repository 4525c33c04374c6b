//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/dentwise/) and project (.dentwise/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{canvas, insights, storage};
use crate::engine::CostTable;
use crate::types::{DentError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Repair pricing table
    pub pricing: CostTable,

    /// Reference image and pointer settings
    pub canvas: CanvasConfig,

    /// Pattern analysis thresholds
    pub analysis: AnalysisConfig,

    /// Point editing behavior
    pub inspection: InspectionConfig,

    /// Persistence settings
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            pricing: CostTable::default(),
            canvas: CanvasConfig::default(),
            analysis: AnalysisConfig::default(),
            inspection: InspectionConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `DentError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        self.pricing.validate()?;

        if !(self.canvas.image_width > 0.0 && self.canvas.image_height > 0.0) {
            return Err(DentError::Config(format!(
                "Canvas image size must be positive, got {}x{}",
                self.canvas.image_width, self.canvas.image_height
            )));
        }

        if !(self.canvas.hit_radius_px.is_finite() && self.canvas.hit_radius_px >= 0.0) {
            return Err(DentError::Config(format!(
                "Canvas hit_radius_px must be a non-negative number, got {}",
                self.canvas.hit_radius_px
            )));
        }

        let a = &self.analysis;
        if !(0.0..=1.0).contains(&a.concentrated_spread)
            || !(0.0..=1.0).contains(&a.widespread_spread)
        {
            return Err(DentError::Config(
                "Analysis spread thresholds must be between 0.0 and 1.0".to_string(),
            ));
        }
        if a.concentrated_spread > a.widespread_spread {
            return Err(DentError::Config(format!(
                "Analysis concentrated_spread ({}) must not exceed widespread_spread ({})",
                a.concentrated_spread, a.widespread_spread
            )));
        }
        if !(a.high_cost_threshold.is_finite() && a.high_cost_threshold >= 0.0) {
            return Err(DentError::Config(
                "Analysis high_cost_threshold must be a non-negative number".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Canvas Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Reference template width in pixels
    pub image_width: f64,
    /// Reference template height in pixels
    pub image_height: f64,
    /// Marker selection radius in viewport pixels
    pub hit_radius_px: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            image_width: canvas::DEFAULT_IMAGE_WIDTH,
            image_height: canvas::DEFAULT_IMAGE_HEIGHT,
            hit_radius_px: canvas::HIT_RADIUS_PX,
        }
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub high_cost_threshold: f64,
    pub concentrated_spread: f64,
    pub widespread_spread: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            high_cost_threshold: insights::HIGH_COST_THRESHOLD,
            concentrated_spread: insights::CONCENTRATED_SPREAD,
            widespread_spread: insights::WIDESPREAD_SPREAD,
        }
    }
}

// =============================================================================
// Inspection Configuration
// =============================================================================

/// What happens to display numbers when a point is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenumberPolicy {
    /// Remaining points are renumbered 1..n in list order
    #[default]
    Compact,
    /// Remaining points keep their numbers; new points get max + 1
    KeepGaps,
}

impl std::fmt::Display for RenumberPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenumberPolicy::Compact => write!(f, "compact"),
            RenumberPolicy::KeepGaps => write!(f, "keep_gaps"),
        }
    }
}

impl std::str::FromStr for RenumberPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "compact" => Ok(RenumberPolicy::Compact),
            "keep_gaps" => Ok(RenumberPolicy::KeepGaps),
            _ => Err(format!(
                "Unknown renumber policy: {}. Valid values: compact, keep_gaps",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectionConfig {
    pub renumber_policy: RenumberPolicy,
}

// =============================================================================
// Storage Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path (relative paths resolve against the working directory)
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(storage::DATA_DIR).join(storage::DATABASE_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.canvas.hit_radius_px, 30.0);
        assert_eq!(config.inspection.renumber_policy, RenumberPolicy::Compact);
    }

    #[test]
    fn test_rejects_inverted_spread_thresholds() {
        let mut config = Config::default();
        config.analysis.concentrated_spread = 0.8;
        config.analysis.widespread_spread = 0.5;
        assert!(matches!(config.validate(), Err(DentError::Config(_))));
    }

    #[test]
    fn test_rejects_empty_canvas() {
        let mut config = Config::default();
        config.canvas.image_width = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_renumber_policy_parse() {
        assert_eq!(
            "keep-gaps".parse::<RenumberPolicy>().unwrap(),
            RenumberPolicy::KeepGaps
        );
        assert!("shuffle".parse::<RenumberPolicy>().is_err());
    }
}
