//! CLI Common Utilities
//!
//! Shared initialization and context management for CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, ConfigLoader};
use crate::constants::storage;
use crate::engine::InspectionService;
use crate::storage::{Database, SharedDatabase, SqliteReportStore};
use crate::types::{DentError, Result};

/// Command execution context
///
/// Config, the report database and a service wired to it. Created via
/// `CommandContext::load()` once the project has been initialized.
pub struct CommandContext {
    /// Project data directory (.dentwise)
    pub data_dir: PathBuf,
    pub config: Config,
    pub db: SharedDatabase,
    pub store: Arc<SqliteReportStore>,
    pub service: InspectionService,
}

impl CommandContext {
    pub fn load() -> Result<Self> {
        let data_dir = require_initialized()?;
        let config = ConfigLoader::load()?;
        let db = open_report_db(&config.storage.database_path)?;
        Ok(Self::with_database(data_dir, config, Arc::new(db)))
    }

    pub fn with_database(data_dir: PathBuf, config: Config, db: SharedDatabase) -> Self {
        let store = Arc::new(SqliteReportStore::new(db.clone()));
        let service = InspectionService::from_config(store.clone(), &config);
        Self {
            data_dir,
            config,
            db,
            store,
            service,
        }
    }
}

/// Require the project data directory to exist
pub fn require_initialized() -> Result<PathBuf> {
    let data_dir = Path::new(storage::DATA_DIR);

    if !data_dir.exists() {
        return Err(DentError::NotInitialized);
    }

    Ok(data_dir.to_path_buf())
}

/// Open an existing report database, migrating its schema if needed
pub fn open_report_db(path: &Path) -> Result<Database> {
    if !path.exists() {
        return Err(DentError::NotInitialized);
    }

    let db = Database::open(path)?;
    db.initialize()?;
    Ok(db)
}

/// Create and initialize the report database
pub fn create_report_db(path: &Path) -> Result<Database> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::open(path)?;
    db.initialize()?;
    Ok(db)
}

pub fn is_initialized() -> bool {
    Path::new(storage::DATA_DIR).exists()
}
