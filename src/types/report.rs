use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::damage::{DamagePoint, POINT_ID_PREFIX};

/// Vehicle outline the inspection is drawn on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    #[default]
    Sedan,
    Suv,
    Truck,
    Van,
    Hatchback,
    Coupe,
    Motorcycle,
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&super::enum_to_str(self))
    }
}

impl std::str::FromStr for VehicleType {
    type Err = super::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sedan" => Ok(VehicleType::Sedan),
            "suv" => Ok(VehicleType::Suv),
            "truck" => Ok(VehicleType::Truck),
            "van" => Ok(VehicleType::Van),
            "hatchback" => Ok(VehicleType::Hatchback),
            "coupe" => Ok(VehicleType::Coupe),
            "motorcycle" => Ok(VehicleType::Motorcycle),
            _ => Err(super::ValidationError::unknown_variant(
                "vehicle_type",
                s,
                &[
                    "sedan",
                    "suv",
                    "truck",
                    "van",
                    "hatchback",
                    "coupe",
                    "motorcycle",
                ],
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Draft,
    InProgress,
    Completed,
    Archived,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&super::enum_to_str(self))
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = super::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "draft" => Ok(ReportStatus::Draft),
            "in_progress" => Ok(ReportStatus::InProgress),
            "completed" => Ok(ReportStatus::Completed),
            "archived" => Ok(ReportStatus::Archived),
            _ => Err(super::ValidationError::unknown_variant(
                "status",
                s,
                &["draft", "in_progress", "completed", "archived"],
            )),
        }
    }
}

/// Aggregate of all damage points recorded during one inspection session.
///
/// `points` order is authoritative: it drives display numbering and the
/// summed total. Mutate through `InspectionService` so that
/// `total_estimated_cost` and `updated_at` stay consistent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DamageReport {
    pub id: i64,
    pub subject_id: i64,
    #[serde(default)]
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(rename = "damage_points")]
    pub points: Vec<DamagePoint>,
    pub total_estimated_cost: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default)]
    pub notes: String,
    /// Highest point id sequence ever issued for this report
    #[serde(default)]
    pub point_sequence: i64,
}

impl DamageReport {
    /// Create an empty draft report for a new inspection session
    pub fn new(id: i64, subject_id: i64, vehicle_type: VehicleType) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id,
            subject_id,
            vehicle_type,
            status: ReportStatus::Draft,
            points: Vec::new(),
            total_estimated_cost: 0.0,
            created_at: now,
            updated_at: now,
            notes: String::new(),
            point_sequence: 0,
        }
    }

    pub fn point(&self, id: &str) -> Option<&DamagePoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn point_by_number(&self, number: u32) -> Option<&DamagePoint> {
        self.points.iter().find(|p| p.display_number == number)
    }

    pub(crate) fn point_index(&self, id: &str) -> Option<usize> {
        self.points.iter().position(|p| p.id == id)
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of point costs in list order
    pub fn sum_point_costs(&self) -> f64 {
        self.points.iter().map(|p| p.estimated_cost).sum()
    }

    /// Recompute the cached total from the points
    pub fn recompute_total(&mut self) {
        self.total_estimated_cost = self.sum_point_costs();
    }

    /// Next display number: one past the highest number in use
    pub fn next_display_number(&self) -> u32 {
        self.points
            .iter()
            .map(|p| p.display_number)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Renumber points 1..n in list order
    pub fn compact_numbers(&mut self) {
        for (i, point) in self.points.iter_mut().enumerate() {
            point.display_number = i as u32 + 1;
        }
    }

    /// Issue a fresh `dmg_<millis>` id, strictly greater than any id this
    /// report has issued before.
    pub(crate) fn issue_point_id(&mut self, now: NaiveDateTime) -> String {
        let highest_existing = self
            .points
            .iter()
            .filter_map(|p| p.id_sequence())
            .max()
            .unwrap_or(0);
        let next = now
            .and_utc()
            .timestamp_millis()
            .max(self.point_sequence + 1)
            .max(highest_existing + 1);
        self.point_sequence = next;
        format!("{}{}", POINT_ID_PREFIX, next)
    }

    pub(crate) fn touch(&mut self, now: NaiveDateTime) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_is_empty_draft() {
        let report = DamageReport::new(7, 6, VehicleType::Van);
        assert!(report.is_empty());
        assert_eq!(report.status, ReportStatus::Draft);
        assert_eq!(report.total_estimated_cost, 0.0);
        assert_eq!(report.created_at, report.updated_at);
        assert_eq!(report.next_display_number(), 1);
    }

    #[test]
    fn test_issue_point_id_is_monotonic() {
        let mut report = DamageReport::new(1, 1, VehicleType::Sedan);
        let now = Utc::now().naive_utc();
        let a = report.issue_point_id(now);
        let b = report.issue_point_id(now);
        assert_ne!(a, b);
        assert!(a.starts_with("dmg_"));
        assert!(report.point_sequence > 0);
    }

    #[test]
    fn test_enum_display() {
        assert_eq!(VehicleType::Van.to_string(), "van");
        assert_eq!(ReportStatus::InProgress.to_string(), "in_progress");
        assert_eq!("SUV".parse::<VehicleType>().unwrap(), VehicleType::Suv);
        assert!("bus".parse::<VehicleType>().is_err());
        assert_eq!(
            "in-progress".parse::<ReportStatus>().unwrap(),
            ReportStatus::InProgress
        );
        assert!("closed".parse::<ReportStatus>().is_err());
    }
}
