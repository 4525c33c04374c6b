//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/dentwise/config.toml)
//! 3. Project config (.dentwise/config.toml)
//! 4. Environment variables (DENTWISE_ prefix, `__` separates nested keys)

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::constants::storage;
use crate::types::{DentError, Result};

const ENV_PREFIX: &str = "DENTWISE_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_layered(&Self::project_dir(), ENV_PREFIX)
    }

    /// Load with an explicit project data directory and env prefix
    pub fn load_layered(project_dir: &Path, env_prefix: &str) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = project_dir.join("config.toml");
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. DENTWISE_CANVAS__HIT_RADIUS_PX -> canvas.hit_radius_px
        figment = figment.merge(Env::prefixed(env_prefix).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| DentError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| DentError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory
    pub fn global_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dentwise").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(storage::DATA_DIR)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config).map_err(|e| DentError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            DentError::Config("Cannot determine global config directory".to_string())
        })?;
        fs::create_dir_all(&global_dir)?;

        let config_path = global_dir.join("config.toml");
        Self::write_default(&config_path, force)?;
        Ok(global_dir)
    }

    /// Initialize project data directory and configuration
    pub fn init_project_in(project_dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(project_dir)?;
        Self::write_default(&project_dir.join("config.toml"), force)?;
        Ok(project_dir.to_path_buf())
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn write_default(config_path: &Path, force: bool) -> Result<()> {
        if !config_path.exists() || force {
            fs::write(config_path, Self::default_config_toml())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }
        Ok(())
    }

    /// Generate default config content (TOML)
    fn default_config_toml() -> String {
        r#"# Dentwise Configuration
# Project settings in .dentwise/config.toml override the global file.

version = "1.0"

# Marker selection and reference template size
[canvas]
image_width = 800.0
image_height = 600.0
hit_radius_px = 30.0

# Insight thresholds
[analysis]
high_cost_threshold = 1000.0
concentrated_spread = 0.3
widespread_spread = 0.7

# Numbering after a point is removed: "compact" or "keep_gaps"
[inspection]
renumber_policy = "compact"

# Repair pricing overrides, e.g.
# [pricing.dent]
# base = 120.0
# multiplier = 1.5
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenumberPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_from_empty_project() {
        let temp_dir = TempDir::new().unwrap();
        let config =
            ConfigLoader::load_layered(temp_dir.path(), "DENTWISE_TEST_EMPTY_").unwrap();
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_init_project_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join(".dentwise");

        ConfigLoader::init_project_in(&project, false).unwrap();
        assert!(project.join("config.toml").exists());

        let config = ConfigLoader::load_from_file(&project.join("config.toml")).unwrap();
        assert_eq!(config.canvas.hit_radius_px, 30.0);
        assert_eq!(config.inspection.renumber_policy, RenumberPolicy::Compact);
    }

    #[test]
    fn test_project_file_overrides_pricing() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("config.toml"),
            "[pricing.dent]\nbase = 120.0\nmultiplier = 1.5\n\n[inspection]\nrenumber_policy = \"keep_gaps\"\n",
        )
        .unwrap();

        let config =
            ConfigLoader::load_layered(temp_dir.path(), "DENTWISE_TEST_FILE_").unwrap();
        assert_eq!(config.pricing.dent.base, 120.0);
        assert_eq!(config.pricing.scratch.base, 50.0);
        assert_eq!(config.inspection.renumber_policy, RenumberPolicy::KeepGaps);
    }

    #[test]
    fn test_invalid_pricing_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[pricing.crack]\nbase = -5.0\nmultiplier = 1.0\n").unwrap();
        assert!(matches!(
            ConfigLoader::load_from_file(&path),
            Err(DentError::Config(_))
        ));
    }

    #[test]
    fn test_env_override() {
        let temp_dir = TempDir::new().unwrap();
        // SAFETY: the prefix is unique to this test
        unsafe {
            std::env::set_var("DENTWISE_TEST_ENV_CANVAS__HIT_RADIUS_PX", "12.5");
        }
        let config = ConfigLoader::load_layered(temp_dir.path(), "DENTWISE_TEST_ENV_").unwrap();
        assert_eq!(config.canvas.hit_radius_px, 12.5);
        unsafe {
            std::env::remove_var("DENTWISE_TEST_ENV_CANVAS__HIT_RADIUS_PX");
        }
    }
}
