//! Unified Error Type System
//!
//! Centralized error types for the damage-assessment engine.
//!
//! ## Error Kinds
//!
//! - **Validation**: rejected input (unknown enum label, NaN coordinate, bad viewport)
//! - **NotFound**: unknown point or report id
//! - **Serialization**: persisted payload missing fields or holding out-of-range values
//! - **Storage**: backing store failures (pool, transactions)
//!
//! Validation and not-found errors are raised before any mutation, so the
//! report a caller holds is never left half-updated.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Structured validation error with context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// What validation failed
    pub kind: ValidationErrorKind,
    /// Field or component that failed validation
    pub field: Option<String>,
    /// Detailed message
    pub message: String,
    /// Expected value or format
    pub expected: Option<String>,
    /// Actual value received
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Validation failed for '{}': {}", field, self.message)?;
        } else {
            write!(f, "Validation failed: {}", self.message)?;
        }
        if let (Some(expected), Some(actual)) = (&self.expected, &self.actual) {
            write!(f, " (expected {}, got {})", expected, actual)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add expected/actual values
    pub fn with_comparison(
        mut self,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    /// Unknown label for one of the fixed enumerations
    pub fn unknown_variant(field: &str, value: &str, valid: &[&str]) -> Self {
        Self::new(
            ValidationErrorKind::UnknownVariant,
            format!("unknown value '{}'", value),
        )
        .with_field(field)
        .with_comparison(valid.join(", "), value)
    }

    /// Coordinate that is not a finite number and therefore cannot be clamped
    pub fn non_finite(field: &str, value: f64) -> Self {
        Self::new(
            ValidationErrorKind::Range,
            "coordinate must be a finite number",
        )
        .with_field(field)
        .with_comparison("finite number", value.to_string())
    }
}

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Label does not name a member of a fixed enumeration
    UnknownVariant,
    /// Value out of range or not finite
    Range,
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum DentError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Validation(ValidationError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not initialized: run 'dentwise init' first")]
    NotInitialized,
}

impl From<ValidationError> for DentError {
    fn from(err: ValidationError) -> Self {
        DentError::Validation(err)
    }
}

impl From<serde_json::Error> for DentError {
    fn from(err: serde_json::Error) -> Self {
        DentError::Serialization(err.to_string())
    }
}

impl From<r2d2::Error> for DentError {
    fn from(err: r2d2::Error) -> Self {
        DentError::Storage(format!("Connection pool error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DentError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl DentError {
    /// Create a not-found error for a damage point
    pub fn point_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Damage point",
            id: id.into(),
        }
    }

    /// Create a not-found error for a damage report
    pub fn report_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "Damage report",
            id: id.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Add context using a closure (lazy evaluation)
    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| DentError::Storage(format!("{}: {}", context.into(), e)))
    }

    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| DentError::Storage(format!("{}: {}", f().into(), e)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::unknown_variant("severity", "Critical", &["Minor", "Severe"]);
        let msg = err.to_string();
        assert!(msg.contains("'severity'"));
        assert!(msg.contains("Critical"));
        assert!(msg.contains("Minor, Severe"));
    }

    #[test]
    fn test_non_finite_kind() {
        let err = ValidationError::non_finite("x", f64::NAN);
        assert_eq!(err.kind, ValidationErrorKind::Range);
        assert_eq!(err.field.as_deref(), Some("x"));
    }

    #[test]
    fn test_not_found_display() {
        let err = DentError::point_not_found("dmg_42");
        assert_eq!(err.to_string(), "Damage point not found: dmg_42");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_json_error_becomes_serialization() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope");
        let err: DentError = parse.unwrap_err().into();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_with_context() {
        let io: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("disk gone"));
        let err = io.with_context("Failed to write report").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Storage error: Failed to write report: disk gone"
        );
    }
}
