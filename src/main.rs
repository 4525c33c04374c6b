use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dentwise::cli::commands::{analyze, config, export, init, point, report};

#[derive(Parser)]
#[command(name = "dentwise")]
#[command(version, about = "Vehicle damage inspection: point mapping, repair estimates, analysis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize dentwise in the current directory
    Init {
        #[arg(long, short, help = "Overwrite existing initialization")]
        force: bool,
    },

    /// Manage damage reports
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// Manage damage points on a report
    Point {
        #[command(subcommand)]
        action: PointAction,
    },

    /// Show statistics and insights for a report
    Analyze {
        report: i64,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Export the report summary as JSON
    Export {
        report: i64,
        #[arg(long, short, help = "Write to file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ReportAction {
    /// Create an empty report
    New {
        #[arg(long, short, help = "Subject (vehicle record) id")]
        subject: i64,
        #[arg(long, help = "Report id (defaults to the next free id)")]
        id: Option<i64>,
        #[arg(
            long,
            default_value = "sedan",
            help = "Vehicle outline: sedan, suv, truck, van, hatchback, coupe, motorcycle"
        )]
        vehicle: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show a report with all its points
    Show {
        id: i64,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },
    /// List stored reports
    List {
        #[arg(long, short)]
        subject: Option<i64>,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },
    /// Change report status or notes
    Set {
        id: i64,
        #[arg(long, help = "draft, in_progress, completed, archived")]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a report
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum PointAction {
    /// Add a point at normalized coordinates (clamped to 0..1)
    Add {
        report: i64,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(long = "type", short = 't', default_value = "scratch")]
        damage_type: String,
        #[arg(long, short, default_value = "minor")]
        severity: String,
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Edit a point by id or display number
    Update {
        report: i64,
        point: String,
        #[arg(long = "type", short = 't')]
        damage_type: Option<String>,
        #[arg(long, short)]
        severity: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, requires = "y", allow_negative_numbers = true)]
        x: Option<f64>,
        #[arg(long, requires = "x", allow_negative_numbers = true)]
        y: Option<f64>,
    },
    /// Remove a point by id or display number
    Remove { report: i64, point: String },
    /// Find the point under a pixel position
    Hit {
        report: i64,
        #[arg(allow_negative_numbers = true)]
        px: f64,
        #[arg(allow_negative_numbers = true)]
        py: f64,
        #[arg(long, requires = "height", help = "Viewport width in pixels")]
        width: Option<f64>,
        #[arg(long, requires = "width", help = "Viewport height in pixels")]
        height: Option<f64>,
        #[arg(long, help = "Remove the point that was hit")]
        remove: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mdentwise encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { force } => init::run(force)?,
        Commands::Report { action } => match action {
            ReportAction::New {
                subject,
                id,
                vehicle,
                notes,
            } => report::new(id, subject, &vehicle, notes.as_deref())?,
            ReportAction::Show { id, format } => report::show(id, &format)?,
            ReportAction::List { subject, format } => report::list(subject, &format)?,
            ReportAction::Set { id, status, notes } => {
                report::set(id, status.as_deref(), notes.as_deref())?
            }
            ReportAction::Delete { id } => report::delete(id)?,
        },
        Commands::Point { action } => match action {
            PointAction::Add {
                report,
                x,
                y,
                damage_type,
                severity,
                description,
            } => point::add(
                report,
                x,
                y,
                &damage_type,
                &severity,
                description.as_deref(),
            )?,
            PointAction::Update {
                report,
                point: selector,
                damage_type,
                severity,
                description,
                x,
                y,
            } => point::update(
                report,
                &selector,
                point::PointFields {
                    damage_type: damage_type.as_deref(),
                    severity: severity.as_deref(),
                    description: description.as_deref(),
                    position: x.zip(y),
                },
            )?,
            PointAction::Remove {
                report,
                point: selector,
            } => point::remove(report, &selector)?,
            PointAction::Hit {
                report,
                px,
                py,
                width,
                height,
                remove,
            } => point::hit(report, px, py, width.zip(height), remove)?,
        },
        Commands::Analyze { report, format } => analyze::run(report, &format)?,
        Commands::Export { report, output } => export::run(report, output.as_deref())?,
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => config::show(global, &format)?,
            ConfigAction::Path => config::path()?,
            ConfigAction::Init { global, force } => {
                if global {
                    config::init_global(force)?;
                } else {
                    config::init_project(force)?;
                }
            }
        },
    }

    Ok(())
}
