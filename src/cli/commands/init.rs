//! Init Command
//!
//! Initialize dentwise in the current directory.

use crate::cli::util::{create_report_db, is_initialized};
use crate::config::ConfigLoader;
use crate::types::{DentError, Result};

pub fn run(force: bool) -> Result<()> {
    let data_dir = ConfigLoader::project_dir();

    if is_initialized() && !force {
        return Err(DentError::Config(
            "Already initialized. Use --force to overwrite.".to_string(),
        ));
    }

    ConfigLoader::init_project_in(&data_dir, force)?;

    // Global config is optional; never overwrite it here
    if let Err(e) = ConfigLoader::init_global(false) {
        tracing::debug!("Global config init skipped: {}", e);
    }

    let config = ConfigLoader::load()?;
    create_report_db(&config.storage.database_path)?;

    println!("✓ Initialized dentwise in {}/", data_dir.display());
    println!("  Database: {}", config.storage.database_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Run 'dentwise report new --subject <id>' to open a report");
    println!("  2. Run 'dentwise point add <report> <x> <y> --type dent --severity minor'");

    Ok(())
}
