//! Damage Pattern Analysis
//!
//! Aggregate statistics and rule-based insights over a report's points.
//!
//! ## Insight Rules
//! - total cost above the high-cost threshold → `HighCost`
//! - any point of severe severity → `NeedsAttention`
//! - all points of one damage type → `ConsistentPattern`
//! - spread below the concentrated threshold on both axes → `Concentrated`
//! - spread above the widespread threshold on either axis → `Widespread`
//! - any cost recorded → `MostExpensiveType`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::types::{DamagePoint, DamageType, NormalizedPoint, Severity, round_cents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    HighCost,
    NeedsAttention,
    ConsistentPattern,
    Concentrated,
    Widespread,
    MostExpensiveType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

/// Max − min on each axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub point_count: usize,
    pub counts_by_type: BTreeMap<DamageType, usize>,
    pub counts_by_severity: BTreeMap<Severity, usize>,
    pub total_cost: f64,
    pub average_cost: f64,
    pub cost_by_type: BTreeMap<DamageType, f64>,
    /// Mean severity score (Minor 1, Moderate 2, Severe 3); 0 when empty
    pub severity_score: f64,
    pub centroid: Option<NormalizedPoint>,
    pub spread: Spread,
    /// Coarse vehicle region of the centroid, e.g. "front-upper"
    pub hotspot: Option<String>,
    pub insights: Vec<Insight>,
}

impl AnalysisResult {
    pub fn has_insight(&self, kind: InsightKind) -> bool {
        self.insights.iter().any(|i| i.kind == kind)
    }

    /// Damage type with the highest summed cost; ties go to the earlier type
    pub fn most_expensive_type(&self) -> Option<(DamageType, f64)> {
        self.cost_by_type
            .iter()
            .fold(None, |best: Option<(DamageType, f64)>, (&t, &c)| match best {
                Some((_, best_cost)) if best_cost >= c => best,
                _ => Some((t, c)),
            })
    }
}

/// Read-only analysis over an ordered point list
#[derive(Debug, Clone, Default)]
pub struct PatternAnalyzer {
    thresholds: AnalysisConfig,
}

impl PatternAnalyzer {
    pub fn new(thresholds: AnalysisConfig) -> Self {
        Self { thresholds }
    }

    pub fn analyze(&self, points: &[DamagePoint]) -> AnalysisResult {
        if points.is_empty() {
            return AnalysisResult::default();
        }

        let mut result = AnalysisResult {
            point_count: points.len(),
            ..AnalysisResult::default()
        };

        let mut severity_sum = 0u32;
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut sum_x, mut sum_y) = (0.0, 0.0);

        for point in points {
            *result.counts_by_type.entry(point.damage_type).or_insert(0) += 1;
            *result.counts_by_severity.entry(point.severity).or_insert(0) += 1;
            *result.cost_by_type.entry(point.damage_type).or_insert(0.0) += point.estimated_cost;
            result.total_cost += point.estimated_cost;
            severity_sum += point.severity.score() as u32;

            min_x = min_x.min(point.x);
            max_x = max_x.max(point.x);
            min_y = min_y.min(point.y);
            max_y = max_y.max(point.y);
            sum_x += point.x;
            sum_y += point.y;
        }

        let n = points.len() as f64;
        result.average_cost = round_cents(result.total_cost / n);
        result.severity_score = severity_sum as f64 / n;
        let centroid = NormalizedPoint {
            x: sum_x / n,
            y: sum_y / n,
        };
        result.centroid = Some(centroid);
        result.hotspot = Some(region_label(centroid));
        result.spread = Spread {
            x: max_x - min_x,
            y: max_y - min_y,
        };

        result.insights = self.insights(&result);

        tracing::debug!(
            "Analyzed {} points: total {:.2}, {} insights",
            result.point_count,
            result.total_cost,
            result.insights.len()
        );
        result
    }

    fn insights(&self, stats: &AnalysisResult) -> Vec<Insight> {
        let mut insights = Vec::new();
        let t = &self.thresholds;

        if stats.total_cost > t.high_cost_threshold {
            insights.push(Insight {
                kind: InsightKind::HighCost,
                message: format!(
                    "High repair cost: estimated total ${:.2} exceeds ${:.2}",
                    stats.total_cost, t.high_cost_threshold
                ),
            });
        }

        let urgent: usize = stats
            .counts_by_severity
            .iter()
            .filter(|(s, _)| s.needs_attention())
            .map(|(_, c)| *c)
            .sum();
        if urgent > 0 {
            insights.push(Insight {
                kind: InsightKind::NeedsAttention,
                message: format!(
                    "Severe damage present: {} point(s) need immediate attention",
                    urgent
                ),
            });
        }

        if stats.counts_by_type.len() == 1
            && let Some(damage_type) = stats.counts_by_type.keys().next()
        {
            insights.push(Insight {
                kind: InsightKind::ConsistentPattern,
                message: format!(
                    "Consistent damage pattern: all {} point(s) are {}",
                    stats.point_count,
                    damage_type.label()
                ),
            });
        }

        let spread = stats.spread;
        if spread.x < t.concentrated_spread && spread.y < t.concentrated_spread {
            insights.push(Insight {
                kind: InsightKind::Concentrated,
                message: "Concentrated damage: points cluster in one area, likely a single impact"
                    .to_string(),
            });
        } else if spread.x > t.widespread_spread || spread.y > t.widespread_spread {
            insights.push(Insight {
                kind: InsightKind::Widespread,
                message: "Widespread damage: points are spread across the vehicle".to_string(),
            });
        }

        if let Some((damage_type, cost)) = stats.most_expensive_type() {
            insights.push(Insight {
                kind: InsightKind::MostExpensiveType,
                message: format!(
                    "Most expensive damage type: {} (${:.2})",
                    damage_type, cost
                ),
            });
        }

        insights
    }
}

/// Thirds along the length (front/middle/rear), halves vertically (upper/lower)
fn region_label(point: NormalizedPoint) -> String {
    let horizontal = if point.x < 1.0 / 3.0 {
        "front"
    } else if point.x > 2.0 / 3.0 {
        "rear"
    } else {
        "middle"
    };
    let vertical = if point.y < 0.5 { "upper" } else { "lower" };
    format!("{}-{}", horizontal, vertical)
}
