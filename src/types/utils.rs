//! Shared utility functions for type serialization and common operations.

use crate::types::{DamageType, ReportStatus, Severity};
use serde::Serialize;
use std::fmt::Display;

// =============================================================================
// Type Parsing
// =============================================================================

/// Trait for parsing strings into enum types with a default fallback.
/// Used where incomplete data should degrade gracefully instead of failing.
/// Logs a warning when an invalid value is encountered.
pub trait ParseWithDefault: Sized {
    /// The name of this type for logging purposes.
    fn type_name() -> &'static str;

    /// The default value to use when parsing fails.
    fn default_value() -> Self;

    /// Try to parse the string, returning None if invalid.
    fn try_parse(s: &str) -> Option<Self>;

    /// Parse a string into this type, returning a default value if parsing fails.
    fn parse_or_default(s: &str) -> Self {
        match Self::try_parse(s) {
            Some(v) => v,
            None => {
                tracing::warn!("Invalid {} value '{}', using default", Self::type_name(), s);
                Self::default_value()
            }
        }
    }
}

impl ParseWithDefault for DamageType {
    fn type_name() -> &'static str {
        "DamageType"
    }

    fn default_value() -> Self {
        DamageType::Scratch
    }

    fn try_parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl ParseWithDefault for Severity {
    fn type_name() -> &'static str {
        "Severity"
    }

    fn default_value() -> Self {
        Severity::Minor
    }

    fn try_parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl ParseWithDefault for ReportStatus {
    fn type_name() -> &'static str {
        "ReportStatus"
    }

    fn default_value() -> Self {
        ReportStatus::Draft
    }

    fn try_parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

/// Serialize an enum to its serde string representation (without quotes).
/// Uses serde_json internally to ensure consistent serialization with
/// the `#[serde(rename_all = ...)]` attributes on enums.
pub fn enum_to_str<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_default()
        .trim_matches('"')
        .to_string()
}

/// Filter an iterator of Results, logging errors at debug level before discarding.
pub fn log_filter_error<T, E: Display>(result: Result<T, E>, context: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!("{}: {}", context, e);
            None
        }
    }
}

/// Round half away from zero to two decimal places (money).
#[inline]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
