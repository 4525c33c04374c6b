//! Analyze Command
//!
//! Print statistics and insights for one report.

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::Result;

pub fn run(report_id: i64, format: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    let report = ctx.service.load_report(report_id)?;
    let analysis = ctx.service.analyze(&report);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        let output = Output::new();
        output.header(&format!(
            "Damage report {} (subject {})",
            report.id, report.subject_id
        ));
        output.analysis(&analysis);
    }
    Ok(())
}
