//! Inspection Service
//!
//! Command facade over the damage model. Every command takes the current
//! report by reference and returns the next state; the input is never
//! modified, so a failed command leaves the caller's report untouched.
//!
//! ## Flow
//! pointer event → [`CoordinateMapper`] → normalized position → command →
//! [`CostEstimator`] → totals recomputed → [`ReportStore`] on save.

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info};

use super::analyzer::{AnalysisResult, PatternAnalyzer};
use super::cost::{CostEstimator, CostTable};
use super::mapper::{CoordinateMapper, PixelPoint};
use super::summary::SummaryDto;
use crate::config::{AnalysisConfig, CanvasConfig, Config, RenumberPolicy};
use crate::storage::ReportStore;
use crate::types::{
    DamagePoint, DamageReport, DamageType, DentError, NormalizedPoint, ReportStatus, Result,
    Severity,
};

/// Partial update for an existing point. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointPatch {
    pub damage_type: Option<DamageType>,
    pub severity: Option<Severity>,
    pub description: Option<String>,
    /// New normalized position, clamped like on insert
    pub position: Option<(f64, f64)>,
}

impl PointPatch {
    pub fn damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = Some(damage_type);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.position = Some((x, y));
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &PointPatch::default()
    }
}

pub struct InspectionService {
    store: Arc<dyn ReportStore>,
    estimator: CostEstimator,
    analyzer: PatternAnalyzer,
    canvas: CanvasConfig,
    renumber_policy: RenumberPolicy,
}

/// Builder for [`InspectionService`]
pub struct InspectionServiceBuilder {
    store: Arc<dyn ReportStore>,
    cost_table: CostTable,
    analysis: AnalysisConfig,
    canvas: CanvasConfig,
    renumber_policy: RenumberPolicy,
}

impl InspectionServiceBuilder {
    pub fn cost_table(mut self, table: CostTable) -> Self {
        self.cost_table = table;
        self
    }

    pub fn analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    pub fn canvas(mut self, canvas: CanvasConfig) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn renumber_policy(mut self, policy: RenumberPolicy) -> Self {
        self.renumber_policy = policy;
        self
    }

    /// Apply every engine-relevant section of a loaded config
    pub fn config(self, config: &Config) -> Self {
        self.cost_table(config.pricing.clone())
            .analysis(config.analysis.clone())
            .canvas(config.canvas.clone())
            .renumber_policy(config.inspection.renumber_policy)
    }

    pub fn build(self) -> InspectionService {
        InspectionService {
            store: self.store,
            estimator: CostEstimator::new(self.cost_table),
            analyzer: PatternAnalyzer::new(self.analysis),
            canvas: self.canvas,
            renumber_policy: self.renumber_policy,
        }
    }
}

impl InspectionService {
    pub fn builder(store: Arc<dyn ReportStore>) -> InspectionServiceBuilder {
        InspectionServiceBuilder {
            store,
            cost_table: CostTable::default(),
            analysis: AnalysisConfig::default(),
            canvas: CanvasConfig::default(),
            renumber_policy: RenumberPolicy::default(),
        }
    }

    pub fn from_config(store: Arc<dyn ReportStore>, config: &Config) -> Self {
        Self::builder(store).config(config).build()
    }

    /// Mapper for the configured reference image, fitted to its own size
    pub fn mapper(&self) -> Result<CoordinateMapper> {
        Ok(
            CoordinateMapper::new(self.canvas.image_width, self.canvas.image_height)?
                .with_hit_radius(self.canvas.hit_radius_px),
        )
    }

    // =========================================================================
    // Point Commands
    // =========================================================================

    pub fn add_point(
        &self,
        report: &DamageReport,
        x: f64,
        y: f64,
        damage_type: DamageType,
        severity: Severity,
        description: Option<&str>,
    ) -> Result<DamageReport> {
        let position = NormalizedPoint::clamped(x, y)?;
        let now = now();

        let mut next = report.clone();
        let point = DamagePoint {
            id: next.issue_point_id(now),
            display_number: next.next_display_number(),
            x: position.x,
            y: position.y,
            damage_type,
            severity,
            description: description.unwrap_or_default().to_string(),
            created_at: now,
            estimated_cost: self.estimator.estimate(damage_type, severity),
        };

        debug!(
            "Report {}: added point #{} ({} {}, {:.2})",
            next.id, point.display_number, severity, damage_type, point.estimated_cost
        );
        next.points.push(point);
        self.finish(&mut next, now);
        Ok(next)
    }

    pub fn update_point(
        &self,
        report: &DamageReport,
        point_id: &str,
        patch: &PointPatch,
    ) -> Result<DamageReport> {
        let index = report
            .point_index(point_id)
            .ok_or_else(|| DentError::point_not_found(point_id))?;
        let position = patch
            .position
            .map(|(x, y)| NormalizedPoint::clamped(x, y))
            .transpose()?;

        let now = now();
        let mut next = report.clone();
        let point = &mut next.points[index];

        let mut repriced = false;
        if let Some(damage_type) = patch.damage_type
            && damage_type != point.damage_type
        {
            point.damage_type = damage_type;
            repriced = true;
        }
        if let Some(severity) = patch.severity
            && severity != point.severity
        {
            point.severity = severity;
            repriced = true;
        }
        if repriced {
            point.estimated_cost = self.estimator.estimate(point.damage_type, point.severity);
        }
        if let Some(description) = &patch.description {
            point.description = description.clone();
        }
        if let Some(position) = position {
            point.set_position(position);
        }

        debug!(
            "Report {}: updated point #{} (repriced: {})",
            next.id, point.display_number, repriced
        );
        self.finish(&mut next, now);
        Ok(next)
    }

    pub fn remove_point(&self, report: &DamageReport, point_id: &str) -> Result<DamageReport> {
        let index = report
            .point_index(point_id)
            .ok_or_else(|| DentError::point_not_found(point_id))?;

        let now = now();
        let mut next = report.clone();
        let removed = next.points.remove(index);
        if self.renumber_policy == RenumberPolicy::Compact {
            next.compact_numbers();
        }

        debug!(
            "Report {}: removed point #{} ({})",
            next.id, removed.display_number, removed.id
        );
        self.finish(&mut next, now);
        Ok(next)
    }

    /// Replace report notes and/or status
    pub fn update_details(
        &self,
        report: &DamageReport,
        notes: Option<&str>,
        status: Option<ReportStatus>,
    ) -> DamageReport {
        let mut next = report.clone();
        if let Some(notes) = notes {
            next.notes = notes.to_string();
        }
        if let Some(status) = status {
            next.status = status;
        }
        next.touch(now());
        next
    }

    fn finish(&self, report: &mut DamageReport, now: NaiveDateTime) {
        report.recompute_total();
        report.touch(now);
    }

    // =========================================================================
    // Pointer Interaction
    // =========================================================================

    /// Existing point under the pointer, if any
    pub fn hit_test<'a>(
        &self,
        report: &'a DamageReport,
        mapper: &CoordinateMapper,
        pixel: PixelPoint,
    ) -> Option<&'a DamagePoint> {
        mapper.hit_test(&report.points, pixel)
    }

    pub fn add_point_at_pixel(
        &self,
        report: &DamageReport,
        mapper: &CoordinateMapper,
        pixel: PixelPoint,
        damage_type: DamageType,
        severity: Severity,
        description: Option<&str>,
    ) -> Result<DamageReport> {
        let position = mapper.to_normalized(pixel)?;
        self.add_point(
            report,
            position.x,
            position.y,
            damage_type,
            severity,
            description,
        )
    }

    /// Remove the point under the pointer. `Ok(None)` when nothing was hit.
    pub fn remove_point_at_pixel(
        &self,
        report: &DamageReport,
        mapper: &CoordinateMapper,
        pixel: PixelPoint,
    ) -> Result<Option<DamageReport>> {
        match self.hit_test(report, mapper, pixel) {
            Some(point) => self.remove_point(report, &point.id).map(Some),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    pub fn analyze(&self, report: &DamageReport) -> AnalysisResult {
        self.analyzer.analyze(&report.points)
    }

    pub fn export_summary(&self, report: &DamageReport) -> SummaryDto {
        SummaryDto::new(report, self.analyze(report))
    }

    pub fn export_summary_json(&self, report: &DamageReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_summary(report))?)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    pub fn save_report(&self, report: &DamageReport) -> Result<()> {
        self.store.save(report)?;
        info!(
            "Saved damage report {} ({} points, total {:.2})",
            report.id,
            report.points.len(),
            report.total_estimated_cost
        );
        Ok(())
    }

    pub fn load_report(&self, id: i64) -> Result<DamageReport> {
        let report = self.store.load(id)?;
        info!(
            "Loaded damage report {} ({} points)",
            report.id,
            report.points.len()
        );
        Ok(report)
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::InsightKind;
    use crate::storage::MemoryReportStore;
    use crate::types::VehicleType;

    fn service() -> InspectionService {
        InspectionService::builder(Arc::new(MemoryReportStore::new())).build()
    }

    fn report() -> DamageReport {
        DamageReport::new(7, 6, VehicleType::Van)
    }

    #[test]
    fn test_add_point_assigns_number_cost_and_total() {
        let service = service();
        let original = report();
        let next = service
            .add_point(&original, 0.42, 0.31, DamageType::Dent, Severity::Severe, None)
            .unwrap();

        assert!(original.is_empty());
        assert_eq!(next.points.len(), 1);
        let point = &next.points[0];
        assert_eq!(point.display_number, 1);
        assert_eq!(point.estimated_cost, 450.0);
        assert_eq!(point.description, "");
        assert!(point.id.starts_with("dmg_"));
        assert_eq!(next.total_estimated_cost, 450.0);
        assert!(next.updated_at >= original.updated_at);
    }

    #[test]
    fn test_add_point_clamps_coordinates() {
        let service = service();
        let next = service
            .add_point(&report(), -0.3, 1.7, DamageType::Scratch, Severity::Minor, Some("sill"))
            .unwrap();
        assert_eq!((next.points[0].x, next.points[0].y), (0.0, 1.0));
        assert_eq!(next.points[0].description, "sill");
    }

    #[test]
    fn test_add_point_rejects_nan() {
        let service = service();
        let err = service
            .add_point(&report(), f64::NAN, 0.5, DamageType::Rust, Severity::Minor, None)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_add_then_remove_restores_total() {
        let service = service();
        let mut current = report();
        for (t, s) in [
            (DamageType::Scratch, Severity::Moderate),
            (DamageType::PaintDamage, Severity::Moderate),
            (DamageType::Crack, Severity::Severe),
        ] {
            current = service.add_point(&current, 0.3, 0.3, t, s, None).unwrap();
        }
        let before = current.total_estimated_cost;

        let added = service
            .add_point(&current, 0.9, 0.1, DamageType::Rust, Severity::Moderate, None)
            .unwrap();
        let id = added.points.last().unwrap().id.clone();
        let removed = service.remove_point(&added, &id).unwrap();

        assert_eq!(removed.total_estimated_cost, before);
    }

    #[test]
    fn test_ids_are_unique_and_never_reused() {
        let service = service();
        let a = service
            .add_point(&report(), 0.1, 0.1, DamageType::Dent, Severity::Minor, None)
            .unwrap();
        let removed_id = a.points[0].id.clone();
        let b = service.remove_point(&a, &removed_id).unwrap();
        let c = service
            .add_point(&b, 0.1, 0.1, DamageType::Dent, Severity::Minor, None)
            .unwrap();
        assert_ne!(c.points[0].id, removed_id);
    }

    #[test]
    fn test_update_point_reprices_on_type_change() {
        let service = service();
        let r = service
            .add_point(&report(), 0.5, 0.5, DamageType::Scratch, Severity::Minor, None)
            .unwrap();
        let id = r.points[0].id.clone();

        let patch = PointPatch::default()
            .damage_type(DamageType::Structural)
            .severity(Severity::Severe)
            .description("frame rail");
        let updated = service.update_point(&r, &id, &patch).unwrap();

        assert_eq!(updated.points[0].estimated_cost, 4500.0);
        assert_eq!(updated.total_estimated_cost, 4500.0);
        assert_eq!(updated.points[0].description, "frame rail");
        assert_eq!(updated.points[0].created_at, r.points[0].created_at);
        assert_eq!(updated.points[0].id, id);
    }

    #[test]
    fn test_update_point_moves_and_clamps() {
        let service = service();
        let r = service
            .add_point(&report(), 0.5, 0.5, DamageType::Dent, Severity::Minor, None)
            .unwrap();
        let id = r.points[0].id.clone();
        let moved = service
            .update_point(&r, &id, &PointPatch::default().position(1.2, 0.25))
            .unwrap();
        assert_eq!((moved.points[0].x, moved.points[0].y), (1.0, 0.25));
        assert_eq!(moved.points[0].estimated_cost, 150.0);

        let err = service
            .update_point(&r, &id, &PointPatch::default().position(0.5, f64::NAN))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_update_and_remove_unknown_point() {
        let service = service();
        let r = service
            .add_point(&report(), 0.5, 0.5, DamageType::Dent, Severity::Minor, None)
            .unwrap();
        let patch = PointPatch::default().severity(Severity::Severe);
        assert!(service.update_point(&r, "dmg_0", &patch).unwrap_err().is_not_found());
        assert!(service.remove_point(&r, "dmg_0").unwrap_err().is_not_found());
        assert_eq!(r.total_estimated_cost, 150.0);
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let service = service();
        let r = service
            .add_point(&report(), 0.5, 0.5, DamageType::Dent, Severity::Minor, None)
            .unwrap();
        let id = r.points[0].id.clone();
        let patch = PointPatch::default();
        assert!(patch.is_empty());
        let same = service.update_point(&r, &id, &patch).unwrap();
        assert_eq!(same.points, r.points);
    }

    fn three_points(service: &InspectionService) -> DamageReport {
        let mut r = report();
        for x in [0.2, 0.5, 0.8] {
            r = service
                .add_point(&r, x, 0.5, DamageType::Dent, Severity::Minor, None)
                .unwrap();
        }
        r
    }

    #[test]
    fn test_compact_renumbering_on_remove() {
        let service = service();
        let r = three_points(&service);
        let middle = r.points[1].id.clone();
        let next = service.remove_point(&r, &middle).unwrap();

        let numbers: Vec<u32> = next.points.iter().map(|p| p.display_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        let added = service
            .add_point(&next, 0.1, 0.1, DamageType::Rust, Severity::Minor, None)
            .unwrap();
        assert_eq!(added.points[2].display_number, 3);
    }

    #[test]
    fn test_keep_gaps_renumbering_on_remove() {
        let service = InspectionService::builder(Arc::new(MemoryReportStore::new()))
            .renumber_policy(RenumberPolicy::KeepGaps)
            .build();
        let r = three_points(&service);
        let middle = r.points[1].id.clone();
        let next = service.remove_point(&r, &middle).unwrap();

        let numbers: Vec<u32> = next.points.iter().map(|p| p.display_number).collect();
        assert_eq!(numbers, vec![1, 3]);
        let added = service
            .add_point(&next, 0.1, 0.1, DamageType::Rust, Severity::Minor, None)
            .unwrap();
        assert_eq!(added.points[2].display_number, 4);
    }

    #[test]
    fn test_pointer_flow() {
        let service = service();
        let mut mapper = service.mapper().unwrap();
        mapper.fit(1600.0, 600.0).unwrap();

        let r = service
            .add_point_at_pixel(
                &report(),
                &mapper,
                PixelPoint::new(800.0, 300.0),
                DamageType::Crack,
                Severity::Moderate,
                None,
            )
            .unwrap();
        assert!((r.points[0].x - 0.5).abs() < 1e-12);
        assert!((r.points[0].y - 0.5).abs() < 1e-12);

        let hit = service.hit_test(&r, &mapper, PixelPoint::new(810.0, 290.0));
        assert_eq!(hit.map(|p| p.display_number), Some(1));

        let miss = service
            .remove_point_at_pixel(&r, &mapper, PixelPoint::new(100.0, 100.0))
            .unwrap();
        assert!(miss.is_none());
        let removed = service
            .remove_point_at_pixel(&r, &mapper, PixelPoint::new(805.0, 300.0))
            .unwrap()
            .unwrap();
        assert!(removed.is_empty());
        assert_eq!(removed.total_estimated_cost, 0.0);
    }

    #[test]
    fn test_scenario_totals_and_insights() {
        let service = service();
        let mut r = report();
        for (x, t, s) in [
            (0.1, DamageType::Scratch, Severity::Minor),
            (0.2, DamageType::Scratch, Severity::Minor),
            (0.9, DamageType::Structural, Severity::Severe),
        ] {
            r = service.add_point(&r, x, 0.5, t, s, None).unwrap();
        }
        assert_eq!(r.total_estimated_cost, 4600.0);

        let analysis = service.analyze(&r);
        assert!(analysis.has_insight(InsightKind::HighCost));
        assert!(!analysis.has_insight(InsightKind::ConsistentPattern));
        assert_eq!(
            analysis.most_expensive_type(),
            Some((DamageType::Structural, 4500.0))
        );
    }

    #[test]
    fn test_save_and_load_through_store() {
        let service = service();
        let r = service
            .add_point(&report(), 0.4, 0.6, DamageType::Rust, Severity::Severe, None)
            .unwrap();
        service.save_report(&r).unwrap();
        assert_eq!(service.load_report(7).unwrap(), r);
        assert!(service.load_report(8).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_details() {
        let service = service();
        let r = service.update_details(
            &report(),
            Some("customer waiting"),
            Some(ReportStatus::Completed),
        );
        assert_eq!(r.notes, "customer waiting");
        assert_eq!(r.status, ReportStatus::Completed);
    }

    #[test]
    fn test_config_applies_pricing() {
        let mut config = Config::default();
        config.pricing.scratch.base = 80.0;
        let service =
            InspectionService::from_config(Arc::new(MemoryReportStore::new()), &config);
        let r = service
            .add_point(&report(), 0.5, 0.5, DamageType::Scratch, Severity::Minor, None)
            .unwrap();
        assert_eq!(r.total_estimated_cost, 80.0);
    }
}
