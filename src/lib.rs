//! dentwise - Vehicle Damage Assessment Engine
//!
//! Records damage points on a normalized vehicle outline, prices each one
//! from a fixed repair table, and derives statistics and insights for the
//! whole inspection.
//!
//! ## Core Features
//!
//! - **Point Editing**: add, update and remove points with stable ids and compact display numbering
//! - **Cost Estimation**: deterministic `base × type multiplier × severity multiplier` pricing
//! - **Coordinate Mapping**: letterboxed viewport transforms and nearest-marker hit-testing
//! - **Pattern Analysis**: counts, centroid, spread and rule-based insights
//! - **Persistence**: whole-aggregate JSON payloads in SQLite with connection pooling
//!
//! ## Quick Start
//!
//! ```ignore
//! use dentwise::{DamageReport, DamageType, InspectionService, MemoryReportStore, Severity, VehicleType};
//!
//! let service = InspectionService::builder(Arc::new(MemoryReportStore::new())).build();
//! let report = DamageReport::new(1, 42, VehicleType::Sedan);
//! let report = service.add_point(&report, 0.42, 0.31, DamageType::Dent, Severity::Moderate, None)?;
//! service.save_report(&report)?;
//! println!("{}", service.export_summary_json(&report)?);
//! ```
//!
//! ## Modules
//!
//! - [`types`]: damage points, reports, errors
//! - [`engine`]: cost estimation, coordinate mapping, analysis, command facade
//! - [`storage`]: report store boundary, JSON codec, SQLite persistence
//! - [`config`]: layered configuration

pub mod cli;
pub mod config;
pub mod constants;
pub mod engine;
pub mod storage;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, RenumberPolicy};

// Error Types
pub use types::error::{DentError, Result, ResultExt, ValidationError};

// Domain
pub use types::{DamagePoint, DamageReport, DamageType, ReportStatus, Severity, VehicleType};

// Storage
pub use storage::{
    Database, MemoryReportStore, PoolConfig, ReportStore, SharedDatabase, SqliteReportStore,
};

// =============================================================================
// Engine Re-exports
// =============================================================================

pub use engine::{
    AnalysisResult, CoordinateMapper, CostEstimator, Insight, InsightKind, InspectionService,
    PatternAnalyzer, PixelPoint, PointPatch, SummaryDto,
};
