use dashmap::DashMap;

use super::{ReportStore, codec};
use crate::types::{DamageReport, DentError, Result};

/// In-process store keeping encoded payloads.
///
/// Payloads go through the same codec as the SQLite store, so a report that
/// round-trips here round-trips there.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    payloads: DashMap<i64, String>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Store a raw payload as-is, bypassing encoding
    pub fn insert_raw(&self, id: i64, payload: impl Into<String>) {
        self.payloads.insert(id, payload.into());
    }
}

impl ReportStore for MemoryReportStore {
    fn save(&self, report: &DamageReport) -> Result<()> {
        let payload = codec::encode_report(report)?;
        self.payloads.insert(report.id, payload);
        Ok(())
    }

    fn load(&self, id: i64) -> Result<DamageReport> {
        let payload = self
            .payloads
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DentError::report_not_found(id))?;
        let report = codec::decode_report(&payload)?;
        if report.id != id {
            return Err(DentError::Serialization(format!(
                "Entry {} holds payload for report {}",
                id, report.id
            )));
        }
        Ok(report)
    }

    fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.payloads.contains_key(&id))
    }
}
