use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::error::{Result, ValidationError};

/// Canonical damage classification.
///
/// Persisted by variant name. The legacy `Paint` label is accepted on input
/// and maps to `PaintDamage`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DamageType {
    Scratch,
    Dent,
    Rust,
    #[serde(alias = "Paint")]
    PaintDamage,
    Crack,
    Structural,
}

impl DamageType {
    pub const ALL: [DamageType; 6] = [
        DamageType::Scratch,
        DamageType::Dent,
        DamageType::Rust,
        DamageType::PaintDamage,
        DamageType::Crack,
        DamageType::Structural,
    ];

    /// Serialized name
    pub fn as_str(&self) -> &'static str {
        match self {
            DamageType::Scratch => "Scratch",
            DamageType::Dent => "Dent",
            DamageType::Rust => "Rust",
            DamageType::PaintDamage => "PaintDamage",
            DamageType::Crack => "Crack",
            DamageType::Structural => "Structural",
        }
    }

    /// Human-readable label for printed summaries
    pub fn label(&self) -> &'static str {
        match self {
            DamageType::PaintDamage => "Paint Damage",
            other => other.as_str(),
        }
    }

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|t| t.as_str()).collect()
    }
}

impl std::fmt::Display for DamageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DamageType {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "scratch" => Ok(DamageType::Scratch),
            "dent" => Ok(DamageType::Dent),
            "rust" => Ok(DamageType::Rust),
            "paintdamage" | "paint" => Ok(DamageType::PaintDamage),
            "crack" => Ok(DamageType::Crack),
            "structural" => Ok(DamageType::Structural),
            _ => Err(ValidationError::unknown_variant(
                "damage_type",
                s,
                &Self::names(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Minor, Severity::Moderate, Severity::Severe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "Minor",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }

    /// Ordinal score used for averaged severity (Minor = 1 .. Severe = 3)
    pub fn score(&self) -> u8 {
        match self {
            Severity::Minor => 1,
            Severity::Moderate => 2,
            Severity::Severe => 3,
        }
    }

    /// Whether a point of this severity needs immediate attention
    pub fn needs_attention(&self) -> bool {
        matches!(self, Severity::Severe)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minor" => Ok(Severity::Minor),
            "moderate" => Ok(Severity::Moderate),
            "severe" => Ok(Severity::Severe),
            _ => Err(ValidationError::unknown_variant(
                "severity",
                s,
                &["Minor", "Moderate", "Severe"],
            )),
        }
    }
}

/// Position on the reference image, as a fraction of its width and height.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    /// Clamp into [0, 1] on both axes. Non-finite input cannot be clamped.
    pub fn clamped(x: f64, y: f64) -> Result<Self> {
        if !x.is_finite() {
            return Err(ValidationError::non_finite("x", x).into());
        }
        if !y.is_finite() {
            return Err(ValidationError::non_finite("y", y).into());
        }
        Ok(Self {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
        })
    }

    pub fn in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// A single annotated defect location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DamagePoint {
    pub id: String,
    #[serde(rename = "number")]
    pub display_number: u32,
    pub x: f64,
    pub y: f64,
    pub damage_type: DamageType,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "timestamp")]
    pub created_at: NaiveDateTime,
    pub estimated_cost: f64,
}

impl DamagePoint {
    pub fn position(&self) -> NormalizedPoint {
        NormalizedPoint {
            x: self.x,
            y: self.y,
        }
    }

    pub fn set_position(&mut self, position: NormalizedPoint) {
        self.x = position.x;
        self.y = position.y;
    }

    /// Numeric part of a `dmg_<millis>` id
    pub fn id_sequence(&self) -> Option<i64> {
        self.id.strip_prefix(POINT_ID_PREFIX)?.parse().ok()
    }
}

pub const POINT_ID_PREFIX: &str = "dmg_";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_type_parse() {
        assert_eq!("dent".parse::<DamageType>().unwrap(), DamageType::Dent);
        assert_eq!(
            "Paint Damage".parse::<DamageType>().unwrap(),
            DamageType::PaintDamage
        );
        assert_eq!(
            "paint_damage".parse::<DamageType>().unwrap(),
            DamageType::PaintDamage
        );
        assert_eq!("Paint".parse::<DamageType>().unwrap(), DamageType::PaintDamage);
        assert!("Glass".parse::<DamageType>().is_err());
    }

    #[test]
    fn test_severity_parse_rejects_unknown() {
        assert_eq!("SEVERE".parse::<Severity>().unwrap(), Severity::Severe);
        let err = "Critical".parse::<Severity>().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("severity"));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&DamageType::PaintDamage).unwrap(),
            "\"PaintDamage\""
        );
        let legacy: DamageType = serde_json::from_str("\"Paint\"").unwrap();
        assert_eq!(legacy, DamageType::PaintDamage);
        assert!(serde_json::from_str::<Severity>("\"Critical\"").is_err());
    }

    #[test]
    fn test_clamped_position() {
        let p = NormalizedPoint::clamped(-0.2, 1.4).unwrap();
        assert_eq!(p, NormalizedPoint { x: 0.0, y: 1.0 });
        assert!(p.in_range());
        assert!(NormalizedPoint::clamped(f64::NAN, 0.5).is_err());
        assert!(NormalizedPoint::clamped(0.5, f64::INFINITY).is_err());
    }

    #[test]
    fn test_id_sequence() {
        let point = DamagePoint {
            id: "dmg_1700000000000".to_string(),
            display_number: 1,
            x: 0.5,
            y: 0.5,
            damage_type: DamageType::Dent,
            severity: Severity::Minor,
            description: String::new(),
            created_at: chrono::Utc::now().naive_utc(),
            estimated_cost: 150.0,
        };
        assert_eq!(point.id_sequence(), Some(1_700_000_000_000));
    }
}
