//! Report Commands
//!
//! Create, inspect, list and delete damage reports.

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::storage::ReportStore;
use crate::types::{DamageReport, DentError, ReportStatus, Result, VehicleType};

pub fn new(id: Option<i64>, subject_id: i64, vehicle: &str, notes: Option<&str>) -> Result<()> {
    let ctx = CommandContext::load()?;
    let vehicle_type: VehicleType = vehicle.parse()?;

    let id = match id {
        Some(id) => {
            if ctx.store.exists(id)? {
                return Err(DentError::Storage(format!(
                    "Damage report {} already exists",
                    id
                )));
            }
            id
        }
        None => next_report_id(&ctx)?,
    };

    let mut report = DamageReport::new(id, subject_id, vehicle_type);
    if let Some(notes) = notes {
        report = ctx.service.update_details(&report, Some(notes), None);
    }
    ctx.service.save_report(&report)?;

    Output::new().success(&format!(
        "Created damage report {} for subject {} ({})",
        report.id, report.subject_id, report.vehicle_type
    ));
    Ok(())
}

pub fn show(id: i64, format: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    let report = ctx.service.load_report(id)?;

    if format == "json" {
        println!("{}", crate::storage::encode_report_pretty(&report)?);
    } else {
        Output::new().report(&report);
    }
    Ok(())
}

pub fn list(subject_id: Option<i64>, format: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    let listings = ctx.store.list_reports(subject_id)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    if listings.is_empty() {
        println!("No damage reports.");
        return Ok(());
    }

    println!(
        "{:<6} {:<8} {:<11} {:<12} {:>6} {:>10}  Updated",
        "ID", "Subject", "Vehicle", "Status", "Points", "Total"
    );
    println!("{}", "─".repeat(72));
    for l in &listings {
        println!(
            "{:<6} {:<8} {:<11} {:<12} {:>6} {:>10.2}  {}",
            l.id,
            l.subject_id,
            l.vehicle_type,
            l.status,
            l.point_count,
            l.total_estimated_cost,
            l.updated_at
        );
    }
    Ok(())
}

pub fn delete(id: i64) -> Result<()> {
    let ctx = CommandContext::load()?;
    ctx.store.delete(id)?;
    Output::new().success(&format!("Deleted damage report {}", id));
    Ok(())
}

/// Update report status and/or notes
pub fn set(id: i64, status: Option<&str>, notes: Option<&str>) -> Result<()> {
    let ctx = CommandContext::load()?;
    let status: Option<ReportStatus> = status.map(str::parse::<ReportStatus>).transpose()?;
    let output = Output::new();

    if status.is_none() && notes.is_none() {
        output.warning("Nothing to update. Pass --status and/or --notes.");
        return Ok(());
    }

    let report = ctx.service.load_report(id)?;
    let report = ctx.service.update_details(&report, notes, status);
    ctx.service.save_report(&report)?;

    output.success(&format!(
        "Updated damage report {} (status: {})",
        report.id, report.status
    ));
    Ok(())
}

fn next_report_id(ctx: &CommandContext) -> Result<i64> {
    let max = ctx
        .store
        .list_reports(None)?
        .iter()
        .map(|l| l.id)
        .max()
        .unwrap_or(0);
    Ok(max + 1)
}
