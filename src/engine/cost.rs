//! Repair Cost Estimation
//!
//! `cost = base[type] × multiplier[type] × severity_multiplier[severity]`,
//! rounded to cents. The whole table is plain configuration data so it can be
//! audited and overridden from `[pricing]` in the config file.

use serde::{Deserialize, Serialize};

use crate::constants::pricing;
use crate::types::{DamageType, DentError, ParseWithDefault, Result, Severity, round_cents};

/// Base cost and type multiplier for one damage type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    pub base: f64,
    pub multiplier: f64,
}

impl CostEntry {
    pub const fn new(base: f64, multiplier: f64) -> Self {
        Self { base, multiplier }
    }

    /// Unrounded base × multiplier
    pub fn weighted(&self) -> f64 {
        self.base * self.multiplier
    }
}

/// Severity multipliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityMultipliers {
    pub minor: f64,
    pub moderate: f64,
    pub severe: f64,
}

impl Default for SeverityMultipliers {
    fn default() -> Self {
        Self {
            minor: pricing::MINOR_MULTIPLIER,
            moderate: pricing::MODERATE_MULTIPLIER,
            severe: pricing::SEVERE_MULTIPLIER,
        }
    }
}

/// Full pricing lookup table.
///
/// `fallback` and `fallback_severity` apply only to labels that do not parse
/// into a known damage type or severity (see [`CostEstimator::estimate_labels`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostTable {
    pub scratch: CostEntry,
    pub dent: CostEntry,
    pub rust: CostEntry,
    pub paint_damage: CostEntry,
    pub crack: CostEntry,
    pub structural: CostEntry,
    pub severity: SeverityMultipliers,
    pub fallback: CostEntry,
    pub fallback_severity: f64,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            scratch: CostEntry::new(pricing::SCRATCH_BASE, pricing::SCRATCH_MULTIPLIER),
            dent: CostEntry::new(pricing::DENT_BASE, pricing::DENT_MULTIPLIER),
            rust: CostEntry::new(pricing::RUST_BASE, pricing::RUST_MULTIPLIER),
            paint_damage: CostEntry::new(
                pricing::PAINT_DAMAGE_BASE,
                pricing::PAINT_DAMAGE_MULTIPLIER,
            ),
            crack: CostEntry::new(pricing::CRACK_BASE, pricing::CRACK_MULTIPLIER),
            structural: CostEntry::new(pricing::STRUCTURAL_BASE, pricing::STRUCTURAL_MULTIPLIER),
            severity: SeverityMultipliers::default(),
            fallback: CostEntry::new(pricing::FALLBACK_BASE, pricing::FALLBACK_MULTIPLIER),
            fallback_severity: pricing::FALLBACK_SEVERITY_MULTIPLIER,
        }
    }
}

impl CostTable {
    pub fn entry(&self, damage_type: DamageType) -> CostEntry {
        match damage_type {
            DamageType::Scratch => self.scratch,
            DamageType::Dent => self.dent,
            DamageType::Rust => self.rust,
            DamageType::PaintDamage => self.paint_damage,
            DamageType::Crack => self.crack,
            DamageType::Structural => self.structural,
        }
    }

    pub fn severity_multiplier(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Minor => self.severity.minor,
            Severity::Moderate => self.severity.moderate,
            Severity::Severe => self.severity.severe,
        }
    }

    /// Every value must be finite and non-negative so estimates are too
    pub fn validate(&self) -> Result<()> {
        let mut values: Vec<(String, f64)> = Vec::new();
        for damage_type in DamageType::ALL {
            let entry = self.entry(damage_type);
            values.push((format!("{}.base", damage_type), entry.base));
            values.push((format!("{}.multiplier", damage_type), entry.multiplier));
        }
        for severity in Severity::ALL {
            values.push((
                format!("severity.{}", severity),
                self.severity_multiplier(severity),
            ));
        }
        values.push(("fallback.base".to_string(), self.fallback.base));
        values.push(("fallback.multiplier".to_string(), self.fallback.multiplier));
        values.push(("fallback_severity".to_string(), self.fallback_severity));

        if let Some((name, value)) = values
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(DentError::Config(format!(
                "Pricing value {} must be a non-negative number, got {}",
                name, value
            )));
        }
        Ok(())
    }
}

/// Stateless cost lookup over a [`CostTable`]
#[derive(Debug, Clone, Default)]
pub struct CostEstimator {
    table: CostTable,
}

impl CostEstimator {
    pub fn new(table: CostTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CostTable {
        &self.table
    }

    pub fn estimate(&self, damage_type: DamageType, severity: Severity) -> f64 {
        round_cents(
            self.table.entry(damage_type).weighted() * self.table.severity_multiplier(severity),
        )
    }

    /// Estimate from raw labels. Unknown labels use the table's fallback
    /// values instead of failing, so partially filled forms still get a price.
    pub fn estimate_labels(&self, damage_type: &str, severity: &str) -> f64 {
        let entry = match DamageType::try_parse(damage_type) {
            Some(t) => self.table.entry(t),
            None => {
                tracing::debug!("Pricing unknown damage type '{}' with fallback", damage_type);
                self.table.fallback
            }
        };
        let severity_multiplier = match Severity::try_parse(severity) {
            Some(s) => self.table.severity_multiplier(s),
            None => {
                tracing::debug!("Pricing unknown severity '{}' with fallback", severity);
                self.table.fallback_severity
            }
        };
        round_cents(entry.weighted() * severity_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_prices() {
        let estimator = CostEstimator::default();
        assert_eq!(estimator.estimate(DamageType::Scratch, Severity::Minor), 50.0);
        assert_eq!(estimator.estimate(DamageType::Dent, Severity::Severe), 450.0);
        assert_eq!(
            estimator.estimate(DamageType::Structural, Severity::Severe),
            4500.0
        );
        assert_eq!(estimator.estimate(DamageType::Rust, Severity::Moderate), 540.0);
        assert_eq!(
            estimator.estimate(DamageType::PaintDamage, Severity::Moderate),
            162.0
        );
        assert_eq!(estimator.estimate(DamageType::Crack, Severity::Minor), 500.0);
    }

    #[test]
    fn test_every_pair_is_deterministic_and_non_negative() {
        let estimator = CostEstimator::default();
        for damage_type in DamageType::ALL {
            for severity in Severity::ALL {
                let a = estimator.estimate(damage_type, severity);
                let b = estimator.estimate(damage_type, severity);
                assert_eq!(a, b);
                assert!(a >= 0.0);
                assert_eq!(a, round_cents(a));
            }
        }
    }

    #[test]
    fn test_labels_fall_back() {
        let estimator = CostEstimator::default();
        assert_eq!(estimator.estimate_labels("Dent", "Severe"), 450.0);
        assert_eq!(estimator.estimate_labels("Glass", "Minor"), 100.0);
        assert_eq!(estimator.estimate_labels("Scratch", "Critical"), 50.0);
        assert_eq!(estimator.estimate_labels("", ""), 100.0);
    }

    #[test]
    fn test_overridden_table() {
        let table = CostTable {
            dent: CostEntry::new(120.0, 1.5),
            ..CostTable::default()
        };
        let estimator = CostEstimator::new(table);
        assert_eq!(estimator.estimate(DamageType::Dent, Severity::Minor), 180.0);
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        let mut table = CostTable::default();
        assert!(table.validate().is_ok());
        table.severity.moderate = f64::NAN;
        assert!(table.validate().is_err());
        table.severity.moderate = 1.8;
        table.rust.base = -1.0;
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("Rust.base"));
    }
}
