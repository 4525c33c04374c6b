use console::style;

use crate::engine::{AnalysisResult, SummaryDto};
use crate::types::{DamageReport, Severity};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Report header and point table
    pub fn report(&self, report: &DamageReport) {
        self.header(&format!(
            "Damage report {} (subject {}, {})",
            report.id, report.subject_id, report.vehicle_type
        ));
        println!("Status:  {}", report.status);
        println!("Updated: {}", report.updated_at.format("%Y-%m-%d %H:%M:%S"));
        if !report.notes.is_empty() {
            println!("Notes:   {}", report.notes);
        }

        self.section(&format!("Points ({})", report.point_count()));
        if report.points.is_empty() {
            println!("No damage recorded.");
        }
        for point in &report.points {
            let severity = match point.severity {
                Severity::Severe => style(point.severity.as_str()).red(),
                Severity::Moderate => style(point.severity.as_str()).yellow(),
                Severity::Minor => style(point.severity.as_str()).green(),
            };
            println!(
                "#{:<3} {:<13} {:<9} ({:.3}, {:.3}) {:>10.2}  {}",
                point.display_number,
                point.damage_type.label(),
                severity,
                point.x,
                point.y,
                point.estimated_cost,
                style(&point.id).dim()
            );
            if !point.description.is_empty() {
                println!("     {}", point.description);
            }
        }
        println!("{}", "─".repeat(40));
        println!(
            "Total estimate: {}",
            style(format!("{:.2}", report.total_estimated_cost)).bold()
        );
    }

    pub fn analysis(&self, analysis: &AnalysisResult) {
        self.section("Analysis");
        if analysis.point_count == 0 {
            println!("No damage recorded.");
            return;
        }
        println!("Points:        {}", analysis.point_count);
        println!("Total cost:    {:.2}", analysis.total_cost);
        println!("Average cost:  {:.2}", analysis.average_cost);
        println!("Severity:      {:.2} / 3", analysis.severity_score);
        for (damage_type, count) in &analysis.counts_by_type {
            let cost = analysis.cost_by_type.get(damage_type).copied().unwrap_or(0.0);
            println!("  {:<13} x{:<3} {:>10.2}", damage_type.label(), count, cost);
        }
        if let (Some(centroid), Some(hotspot)) = (analysis.centroid, &analysis.hotspot) {
            println!(
                "Centroid:      ({:.3}, {:.3}) {}",
                centroid.x, centroid.y, hotspot
            );
            println!(
                "Spread:        {:.3} x {:.3}",
                analysis.spread.x, analysis.spread.y
            );
        }

        if !analysis.insights.is_empty() {
            self.section("Insights");
            for insight in &analysis.insights {
                self.info(&insight.message);
            }
        }
    }

    pub fn summary(&self, summary: &SummaryDto) {
        println!(
            "Report {}: {} point(s), total {:.2}",
            summary.report_id, summary.point_count, summary.total_estimated_cost
        );
        for message in summary.insight_messages() {
            println!("  - {}", message);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
