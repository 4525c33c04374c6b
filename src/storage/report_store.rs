use rusqlite::{OptionalExtension, params};
use serde::Serialize;

use super::{ReportStore, SharedDatabase, codec};
use crate::types::{
    DamageReport, DentError, ParseWithDefault, ReportStatus, Result, enum_to_str,
    log_filter_error,
};

/// Row summary for listing reports without decoding payloads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportListing {
    pub id: i64,
    pub subject_id: i64,
    pub vehicle_type: String,
    pub status: ReportStatus,
    pub point_count: usize,
    pub total_estimated_cost: f64,
    pub updated_at: String,
}

/// SQLite-backed report store: one row per report, whole payload replaced on save.
#[derive(Clone)]
pub struct SqliteReportStore {
    db: SharedDatabase,
}

impl SqliteReportStore {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    pub fn list_reports(&self, subject_id: Option<i64>) -> Result<Vec<ReportListing>> {
        let conn = self.db.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, subject_id, vehicle_type, status, point_count, total_estimated_cost, updated_at
             FROM damage_reports
             WHERE (?1 IS NULL OR subject_id = ?1)
             ORDER BY id",
        )?;

        let listings = stmt
            .query_map(params![subject_id], |row| {
                let status: String = row.get(3)?;
                let point_count: i64 = row.get(4)?;
                Ok(ReportListing {
                    id: row.get(0)?,
                    subject_id: row.get(1)?,
                    vehicle_type: row.get(2)?,
                    status: ReportStatus::parse_or_default(&status),
                    point_count: point_count.max(0) as usize,
                    total_estimated_cost: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            })?
            .filter_map(|r| log_filter_error(r, "reading report listing"))
            .collect();

        Ok(listings)
    }

    /// Remove a report. Returns `NotFound` when no row matched.
    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self
            .db
            .execute("DELETE FROM damage_reports WHERE id = ?1", &[&id])?;
        if affected == 0 {
            return Err(DentError::report_not_found(id));
        }
        tracing::info!("Deleted damage report {}", id);
        Ok(())
    }
}

impl ReportStore for SqliteReportStore {
    fn save(&self, report: &DamageReport) -> Result<()> {
        let payload = codec::encode_report(report)?;
        let vehicle_type = enum_to_str(&report.vehicle_type);
        let status = enum_to_str(&report.status);
        let point_count = report.points.len() as i64;
        let total = report.total_estimated_cost;
        let created_at = report.created_at.to_string();
        let updated_at = report.updated_at.to_string();
        let (id, subject_id) = (report.id, report.subject_id);

        self.db.transaction(move |conn| {
            conn.execute(
                r#"
                INSERT INTO damage_reports
                    (id, subject_id, vehicle_type, status, point_count, total_estimated_cost, payload, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(id) DO UPDATE SET
                    subject_id = excluded.subject_id,
                    vehicle_type = excluded.vehicle_type,
                    status = excluded.status,
                    point_count = excluded.point_count,
                    total_estimated_cost = excluded.total_estimated_cost,
                    payload = excluded.payload,
                    created_at = excluded.created_at,
                    updated_at = excluded.updated_at
                "#,
                params![
                    id,
                    subject_id,
                    vehicle_type,
                    status,
                    point_count,
                    total,
                    payload,
                    created_at,
                    updated_at
                ],
            )?;
            Ok(())
        })
    }

    fn load(&self, id: i64) -> Result<DamageReport> {
        let conn = self.db.connection()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM damage_reports WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        let payload = payload.ok_or_else(|| DentError::report_not_found(id))?;
        let report = codec::decode_report(&payload)?;
        if report.id != id {
            return Err(DentError::Serialization(format!(
                "Row {} holds payload for report {}",
                id, report.id
            )));
        }
        Ok(report)
    }

    fn exists(&self, id: i64) -> Result<bool> {
        let conn = self.db.connection()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM damage_reports WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
