//! Report persistence
//!
//! The engine only talks to [`ReportStore`]. Each `save` replaces the whole
//! aggregate; concurrent writers to the same id resolve as last write wins.

pub mod codec;
pub mod database;
pub mod memory;
pub mod report_store;

pub use codec::{decode_report, encode_report, encode_report_pretty};
pub use database::{Database, PoolConfig, SharedDatabase};
pub use memory::MemoryReportStore;
pub use report_store::{ReportListing, SqliteReportStore};

use crate::types::{DamageReport, Result};

/// Durable storage boundary for report aggregates
pub trait ReportStore: Send + Sync {
    /// Atomically replace the stored aggregate with `report`
    fn save(&self, report: &DamageReport) -> Result<()>;

    /// Load a complete report, or `NotFound` / `Serialization` without a partial result
    fn load(&self, id: i64) -> Result<DamageReport>;

    fn exists(&self, id: i64) -> Result<bool> {
        match self.load(id) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
