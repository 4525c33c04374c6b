pub mod damage;
pub mod error;
pub mod report;
pub mod utils;

pub use damage::{DamagePoint, DamageType, NormalizedPoint, Severity};
pub use error::{DentError, Result, ResultExt, ValidationError, ValidationErrorKind};
pub use report::{DamageReport, ReportStatus, VehicleType};
pub use utils::{ParseWithDefault, enum_to_str, log_filter_error, round_cents};
