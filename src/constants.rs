//! Global Constants
//!
//! Centralized constants for pricing, canvas geometry and analysis thresholds.
//! All magic numbers should be defined here with documentation.

/// Reference repair pricing (base cost x type multiplier x severity multiplier)
pub mod pricing {
    pub const SCRATCH_BASE: f64 = 50.0;
    pub const SCRATCH_MULTIPLIER: f64 = 1.0;

    pub const DENT_BASE: f64 = 100.0;
    pub const DENT_MULTIPLIER: f64 = 1.5;

    pub const RUST_BASE: f64 = 150.0;
    pub const RUST_MULTIPLIER: f64 = 2.0;

    pub const PAINT_DAMAGE_BASE: f64 = 75.0;
    pub const PAINT_DAMAGE_MULTIPLIER: f64 = 1.2;

    pub const CRACK_BASE: f64 = 200.0;
    pub const CRACK_MULTIPLIER: f64 = 2.5;

    pub const STRUCTURAL_BASE: f64 = 500.0;
    pub const STRUCTURAL_MULTIPLIER: f64 = 3.0;

    pub const MINOR_MULTIPLIER: f64 = 1.0;
    pub const MODERATE_MULTIPLIER: f64 = 1.8;
    pub const SEVERE_MULTIPLIER: f64 = 3.0;

    /// Used for damage type labels that are not recognized
    pub const FALLBACK_BASE: f64 = 100.0;
    pub const FALLBACK_MULTIPLIER: f64 = 1.0;

    /// Used for severity labels that are not recognized
    pub const FALLBACK_SEVERITY_MULTIPLIER: f64 = 1.0;
}

/// Reference image and pointer interaction
pub mod canvas {
    /// Default template image width (pixels)
    pub const DEFAULT_IMAGE_WIDTH: f64 = 800.0;

    /// Default template image height (pixels)
    pub const DEFAULT_IMAGE_HEIGHT: f64 = 600.0;

    /// Maximum pointer distance for selecting an existing marker (pixels)
    pub const HIT_RADIUS_PX: f64 = 30.0;
}

/// Pattern analysis thresholds
pub mod insights {
    /// Total cost above which the report is flagged as expensive
    pub const HIGH_COST_THRESHOLD: f64 = 1000.0;

    /// Spread below this on both axes means damage is concentrated
    pub const CONCENTRATED_SPREAD: f64 = 0.3;

    /// Spread above this on either axis means damage is widespread
    pub const WIDESPREAD_SPREAD: f64 = 0.7;
}

/// Persistence
pub mod storage {
    /// Stored total may differ from the summed point costs by at most this much
    pub const TOTAL_TOLERANCE: f64 = 0.005;

    /// Project data directory
    pub const DATA_DIR: &str = ".dentwise";

    /// Database path relative to the data directory
    pub const DATABASE_FILE: &str = "inspections.db";
}
