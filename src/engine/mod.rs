//! Damage-Assessment Engine
//!
//! - [`cost`]: deterministic repair pricing
//! - [`mapper`]: normalized ↔ viewport transforms and hit-testing
//! - [`analyzer`]: aggregate statistics and insights
//! - [`service`]: command facade tying the above to a [`ReportStore`](crate::storage::ReportStore)

pub mod analyzer;
pub mod cost;
pub mod mapper;
pub mod service;
pub mod summary;

pub use analyzer::{AnalysisResult, Insight, InsightKind, PatternAnalyzer, Spread};
pub use cost::{CostEntry, CostEstimator, CostTable, SeverityMultipliers};
pub use mapper::{CoordinateMapper, PixelPoint, ProjectedPoint};
pub use service::{InspectionService, InspectionServiceBuilder, PointPatch};
pub use summary::{PointSummary, SummaryDto};
