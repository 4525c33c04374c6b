use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::analyzer::AnalysisResult;
use crate::types::{DamageReport, DamageType, ReportStatus, Severity, VehicleType};

/// One row per damage point, in report order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSummary {
    pub number: u32,
    pub id: String,
    pub damage_type: DamageType,
    pub severity: Severity,
    pub description: String,
    pub x: f64,
    pub y: f64,
    pub estimated_cost: f64,
}

/// Export shape for external consumers: report fields plus analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDto {
    pub report_id: i64,
    pub subject_id: i64,
    pub vehicle_type: VehicleType,
    pub status: ReportStatus,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub point_count: usize,
    pub total_estimated_cost: f64,
    pub points: Vec<PointSummary>,
    pub analysis: AnalysisResult,
}

impl SummaryDto {
    pub fn new(report: &DamageReport, analysis: AnalysisResult) -> Self {
        Self {
            report_id: report.id,
            subject_id: report.subject_id,
            vehicle_type: report.vehicle_type,
            status: report.status,
            notes: report.notes.clone(),
            created_at: report.created_at,
            updated_at: report.updated_at,
            point_count: report.point_count(),
            total_estimated_cost: report.total_estimated_cost,
            points: report
                .points
                .iter()
                .map(|p| PointSummary {
                    number: p.display_number,
                    id: p.id.clone(),
                    damage_type: p.damage_type,
                    severity: p.severity,
                    description: p.description.clone(),
                    x: p.x,
                    y: p.y,
                    estimated_cost: p.estimated_cost,
                })
                .collect(),
            analysis,
        }
    }

    /// Insight messages only, in rule order
    pub fn insight_messages(&self) -> Vec<&str> {
        self.analysis
            .insights
            .iter()
            .map(|i| i.message.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::InspectionService;
    use crate::storage::MemoryReportStore;
    use crate::types::{DamageReport, DamageType, Severity, VehicleType};
    use std::sync::Arc;

    #[test]
    fn test_export_summary_shape() {
        let service = InspectionService::builder(Arc::new(MemoryReportStore::new())).build();
        let report = DamageReport::new(7, 6, VehicleType::Van);
        let report = service
            .add_point(&report, 0.42, 0.31, DamageType::Dent, Severity::Severe, Some("door"))
            .unwrap();

        let summary = service.export_summary(&report);
        assert_eq!(summary.report_id, 7);
        assert_eq!(summary.point_count, 1);
        assert_eq!(summary.points[0].number, 1);
        assert_eq!(summary.points[0].description, "door");
        assert_eq!(summary.total_estimated_cost, 450.0);
        assert_eq!(summary.analysis.total_cost, 450.0);
        assert!(
            summary
                .insight_messages()
                .iter()
                .any(|m| m.starts_with("Severe damage present"))
        );

        let json: serde_json::Value =
            serde_json::from_str(&service.export_summary_json(&report).unwrap()).unwrap();
        assert_eq!(json["vehicle_type"], "van");
        assert_eq!(json["points"][0]["damage_type"], "Dent");
        assert_eq!(json["analysis"]["point_count"], 1);
    }

    #[test]
    fn test_export_empty_report() {
        let service = InspectionService::builder(Arc::new(MemoryReportStore::new())).build();
        let summary = service.export_summary(&DamageReport::new(1, 1, VehicleType::Sedan));
        assert_eq!(summary.point_count, 0);
        assert!(summary.points.is_empty());
        assert!(summary.analysis.insights.is_empty());
    }
}
