//! Export Command
//!
//! Write the summary document for a report to stdout or a file.

use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::{Result, ResultExt};

pub fn run(report_id: i64, output_path: Option<&Path>) -> Result<()> {
    let ctx = CommandContext::load()?;
    let report = ctx.service.load_report(report_id)?;
    let json = ctx.service.export_summary_json(&report)?;

    match output_path {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, format!("{}\n", json))
                .with_context_fn(|| format!("Failed to write {}", path.display()))?;

            let output = Output::new();
            output.success(&format!("Exported report {} to {}", report.id, path.display()));
            output.summary(&ctx.service.export_summary(&report));
        }
        None => println!("{}", json),
    }
    Ok(())
}
