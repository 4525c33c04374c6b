//! JSON encoding of the report aggregate.
//!
//! Decoding is all-or-nothing: a payload that parses but breaks an aggregate
//! invariant is rejected as a whole with `DentError::Serialization`.

use std::collections::HashSet;

use crate::constants::storage::TOTAL_TOLERANCE;
use crate::types::{DamageReport, DentError, Result};

pub fn encode_report(report: &DamageReport) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}

pub fn encode_report_pretty(report: &DamageReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Decode and validate a payload. A stored total within tolerance of the point
/// sum is replaced by the exact sum.
pub fn decode_report(payload: &str) -> Result<DamageReport> {
    let mut report: DamageReport = serde_json::from_str(payload)?;
    check_integrity(&report).map_err(|reason| {
        DentError::Serialization(format!("Report {} rejected: {}", report.id, reason))
    })?;
    report.recompute_total();
    Ok(report)
}

/// Invariants every persisted report must satisfy
pub fn check_integrity(report: &DamageReport) -> std::result::Result<(), String> {
    let mut ids = HashSet::new();
    let mut numbers = HashSet::new();

    for point in &report.points {
        if point.id.is_empty() {
            return Err(format!("point #{} has an empty id", point.display_number));
        }
        if !ids.insert(point.id.as_str()) {
            return Err(format!("duplicate point id {}", point.id));
        }
        if point.display_number == 0 {
            return Err(format!("point {} has display number 0", point.id));
        }
        if !numbers.insert(point.display_number) {
            return Err(format!("duplicate display number {}", point.display_number));
        }
        if !point.position().in_range() {
            return Err(format!(
                "point {} position ({}, {}) outside [0, 1]",
                point.id, point.x, point.y
            ));
        }
        if !(point.estimated_cost.is_finite() && point.estimated_cost >= 0.0) {
            return Err(format!(
                "point {} has invalid cost {}",
                point.id, point.estimated_cost
            ));
        }
    }

    let expected = report.sum_point_costs();
    if !report.total_estimated_cost.is_finite()
        || (report.total_estimated_cost - expected).abs() > TOTAL_TOLERANCE
    {
        return Err(format!(
            "total_estimated_cost {} does not match point sum {}",
            report.total_estimated_cost, expected
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::InspectionService;
    use crate::storage::MemoryReportStore;
    use crate::types::{DamageType, Severity, VehicleType};
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;
    use std::sync::Arc;

    const SAMPLE: &str = r#"{
        "id": 7, "subject_id": 6, "vehicle_type": "van",
        "damage_points": [
            { "id": "dmg_1700000000000", "number": 1, "x": 0.42, "y": 0.31,
              "damage_type": "Dent", "severity": "Severe", "description": "",
              "timestamp": "2024-01-01T12:00:00", "estimated_cost": 450.0 }
        ],
        "total_estimated_cost": 450.0,
        "created_at": "2024-01-01T11:59:00", "updated_at": "2024-01-01T12:00:00",
        "notes": ""
    }"#;

    fn modify(f: impl FnOnce(&mut serde_json::Value)) -> String {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        f(&mut value);
        value.to_string()
    }

    #[test]
    fn test_decode_documented_shape() {
        let report = decode_report(SAMPLE).unwrap();
        assert_eq!(report.id, 7);
        assert_eq!(report.subject_id, 6);
        assert_eq!(report.vehicle_type, VehicleType::Van);
        assert_eq!(report.points.len(), 1);

        let point = &report.points[0];
        assert_eq!(point.display_number, 1);
        assert_eq!(point.damage_type, DamageType::Dent);
        assert_eq!(point.severity, Severity::Severe);
        assert_eq!(
            point.created_at,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
        assert_eq!(point.id_sequence(), Some(1_700_000_000_000));
    }

    #[test]
    fn test_encode_uses_documented_field_names() {
        let report = decode_report(SAMPLE).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&encode_report(&report).unwrap()).unwrap();
        assert_eq!(value["damage_points"][0]["number"], 1);
        assert_eq!(value["damage_points"][0]["timestamp"], "2024-01-01T12:00:00");
        assert_eq!(value["vehicle_type"], "van");
        assert_eq!(value["status"], "draft");
        assert_eq!(value["total_estimated_cost"], 450.0);
    }

    #[test]
    fn test_rejects_missing_required_field() {
        let payload = modify(|v| {
            v["damage_points"][0].as_object_mut().unwrap().remove("severity");
        });
        assert!(decode_report(&payload).unwrap_err().is_serialization());

        let payload = modify(|v| {
            v.as_object_mut().unwrap().remove("total_estimated_cost");
        });
        assert!(decode_report(&payload).unwrap_err().is_serialization());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let payload = modify(|v| v["damage_points"][0]["x"] = 1.5.into());
        assert!(decode_report(&payload).unwrap_err().is_serialization());

        let payload = modify(|v| v["damage_points"][0]["estimated_cost"] = (-1.0).into());
        assert!(decode_report(&payload).is_err());

        let payload = modify(|v| v["damage_points"][0]["number"] = 0.into());
        assert!(decode_report(&payload).is_err());

        let payload = modify(|v| v["damage_points"][0]["severity"] = "Critical".into());
        assert!(decode_report(&payload).unwrap_err().is_serialization());
    }

    #[test]
    fn test_rejects_inconsistent_total() {
        let payload = modify(|v| v["total_estimated_cost"] = 999.0.into());
        let err = decode_report(&payload).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_total_within_tolerance_is_normalized() {
        let payload = modify(|v| v["total_estimated_cost"] = 450.004.into());
        let report = decode_report(&payload).unwrap();
        assert_eq!(report.total_estimated_cost, 450.0);
        assert_eq!(report.total_estimated_cost, report.sum_point_costs());

        let service = InspectionService::builder(Arc::new(MemoryReportStore::new())).build();
        assert_eq!(service.analyze(&report).total_cost, report.total_estimated_cost);
    }

    #[test]
    fn test_rejects_duplicate_numbers() {
        let payload = modify(|v| {
            let mut copy = v["damage_points"][0].clone();
            copy["id"] = "dmg_1700000000001".into();
            v["damage_points"].as_array_mut().unwrap().push(copy);
            v["total_estimated_cost"] = 900.0.into();
        });
        let err = decode_report(&payload).unwrap_err();
        assert!(err.to_string().contains("duplicate display number"));
    }

    fn arb_type() -> impl Strategy<Value = DamageType> {
        proptest::sample::select(DamageType::ALL.to_vec())
    }

    fn arb_severity() -> impl Strategy<Value = Severity> {
        proptest::sample::select(Severity::ALL.to_vec())
    }

    fn arb_point() -> impl Strategy<Value = (f64, f64, DamageType, Severity, String)> {
        (
            -0.2f64..1.2,
            -0.2f64..1.2,
            arb_type(),
            arb_severity(),
            "[a-z ]{0,12}",
        )
    }

    proptest! {
        #[test]
        fn prop_save_load_round_trip(
            id in 1i64..10_000,
            subject in 1i64..10_000,
            points in proptest::collection::vec(arb_point(), 0..12),
            removals in proptest::collection::vec(0usize..12, 0..4),
            notes in "[ -~]{0,40}",
        ) {
            let store = Arc::new(MemoryReportStore::new());
            let service = InspectionService::builder(store).build();

            let mut report = DamageReport::new(id, subject, VehicleType::Truck);
            report.notes = notes;
            for (x, y, t, s, d) in points {
                report = service.add_point(&report, x, y, t, s, Some(d.as_str())).unwrap();
            }
            for index in removals {
                if let Some(target) = report.points.get(index).map(|p| p.id.clone()) {
                    report = service.remove_point(&report, &target).unwrap();
                }
            }

            service.save_report(&report).unwrap();
            let loaded = service.load_report(id).unwrap();
            prop_assert_eq!(&loaded, &report);

            let reencoded = decode_report(&encode_report(&report).unwrap()).unwrap();
            prop_assert_eq!(reencoded, report);
        }
    }

    #[test]
    fn test_fractional_timestamps_round_trip() {
        let mut report = decode_report(SAMPLE).unwrap();
        report.updated_at = NaiveDateTime::parse_from_str(
            "2024-01-01 12:00:00.123456789",
            "%Y-%m-%d %H:%M:%S%.f",
        )
        .unwrap();
        let back = decode_report(&encode_report(&report).unwrap()).unwrap();
        assert_eq!(back.updated_at, report.updated_at);
    }
}
