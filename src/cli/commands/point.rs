//! Point Commands
//!
//! Add, edit, remove and hit-test damage points on a stored report.
//! Points are addressed either by id (`dmg_...`) or by display number.

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::engine::{PixelPoint, PointPatch};
use crate::types::{DamageReport, DamageType, DentError, Result, Severity};

pub struct PointFields<'a> {
    pub damage_type: Option<&'a str>,
    pub severity: Option<&'a str>,
    pub description: Option<&'a str>,
    pub position: Option<(f64, f64)>,
}

pub fn add(
    report_id: i64,
    x: f64,
    y: f64,
    damage_type: &str,
    severity: &str,
    description: Option<&str>,
) -> Result<()> {
    let ctx = CommandContext::load()?;
    let damage_type: DamageType = damage_type.parse()?;
    let severity: Severity = severity.parse()?;

    let report = ctx.service.load_report(report_id)?;
    let report = ctx
        .service
        .add_point(&report, x, y, damage_type, severity, description)?;
    ctx.service.save_report(&report)?;

    if let Some(point) = report.points.last() {
        Output::new().success(&format!(
            "Added point #{} {} ({} {}, {:.2}); total {:.2}",
            point.display_number,
            point.id,
            point.severity,
            point.damage_type,
            point.estimated_cost,
            report.total_estimated_cost
        ));
    }
    Ok(())
}

pub fn update(report_id: i64, selector: &str, fields: PointFields<'_>) -> Result<()> {
    let ctx = CommandContext::load()?;
    let output = Output::new();

    let mut patch = PointPatch::default();
    if let Some(damage_type) = fields.damage_type {
        patch = patch.damage_type(damage_type.parse()?);
    }
    if let Some(severity) = fields.severity {
        patch = patch.severity(severity.parse()?);
    }
    if let Some(description) = fields.description {
        patch = patch.description(description);
    }
    if let Some((x, y)) = fields.position {
        patch = patch.position(x, y);
    }
    if patch.is_empty() {
        output.warning("Nothing to update.");
        return Ok(());
    }

    let report = ctx.service.load_report(report_id)?;
    let point_id = resolve_point(&report, selector)?;
    let report = ctx.service.update_point(&report, &point_id, &patch)?;
    ctx.service.save_report(&report)?;

    output.success(&format!(
        "Updated point {}; total {:.2}",
        point_id, report.total_estimated_cost
    ));
    Ok(())
}

pub fn remove(report_id: i64, selector: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    let report = ctx.service.load_report(report_id)?;
    let point_id = resolve_point(&report, selector)?;
    let report = ctx.service.remove_point(&report, &point_id)?;
    ctx.service.save_report(&report)?;

    Output::new().success(&format!(
        "Removed point {}; {} remaining, total {:.2}",
        point_id,
        report.points.len(),
        report.total_estimated_cost
    ));
    Ok(())
}

/// Hit-test a pixel position in a viewport. With `remove`, delete the hit point.
pub fn hit(
    report_id: i64,
    px: f64,
    py: f64,
    viewport: Option<(f64, f64)>,
    remove: bool,
) -> Result<()> {
    let ctx = CommandContext::load()?;
    let output = Output::new();
    let report = ctx.service.load_report(report_id)?;

    let mut mapper = ctx.service.mapper()?;
    if let Some((width, height)) = viewport {
        mapper.fit(width, height)?;
    }
    let pixel = PixelPoint::new(px, py);

    let Some(point) = ctx.service.hit_test(&report, &mapper, pixel) else {
        let position = mapper.to_normalized(pixel)?;
        output.info(&format!(
            "No point within {:.0}px of ({:.1}, {:.1}); normalized ({:.3}, {:.3})",
            mapper.hit_radius(),
            px,
            py,
            position.x,
            position.y
        ));
        return Ok(());
    };

    let (id, number) = (point.id.clone(), point.display_number);
    output.success(&format!(
        "Hit point #{} {} ({} {}, {:.2})",
        number, id, point.severity, point.damage_type, point.estimated_cost
    ));

    if remove {
        let report = ctx.service.remove_point(&report, &id)?;
        ctx.service.save_report(&report)?;
        output.success(&format!(
            "Removed point #{}; total {:.2}",
            number, report.total_estimated_cost
        ));
    }
    Ok(())
}

/// Resolve a point id or display number to the point's id
pub(crate) fn resolve_point(report: &DamageReport, selector: &str) -> Result<String> {
    let found = match selector.trim_start_matches('#').parse::<u32>() {
        Ok(number) => report.point_by_number(number),
        Err(_) => report.point(selector),
    };
    found
        .map(|p| p.id.clone())
        .ok_or_else(|| DentError::point_not_found(selector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::InspectionService;
    use crate::storage::MemoryReportStore;
    use crate::types::VehicleType;
    use std::sync::Arc;

    #[test]
    fn test_resolve_point_by_number_or_id() {
        let service = InspectionService::builder(Arc::new(MemoryReportStore::new())).build();
        let report = DamageReport::new(1, 1, VehicleType::Sedan);
        let report = service
            .add_point(&report, 0.2, 0.2, DamageType::Dent, Severity::Minor, None)
            .unwrap();
        let report = service
            .add_point(&report, 0.6, 0.6, DamageType::Rust, Severity::Severe, None)
            .unwrap();

        let second = report.points[1].id.clone();
        assert_eq!(resolve_point(&report, "2").unwrap(), second);
        assert_eq!(resolve_point(&report, "#2").unwrap(), second);
        assert_eq!(resolve_point(&report, &second).unwrap(), second);
        assert!(resolve_point(&report, "7").unwrap_err().is_not_found());
        assert!(resolve_point(&report, "dmg_0").unwrap_err().is_not_found());
    }
}
