//! Maps raw ratios and durations onto a bounded [0, 1] quality signal.

use serde::Serialize;

/// How a raw metric is turned into a quality signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Normalization {
    /// Higher is better; the raw value is already a 0-1 ratio.
    Rate,
    /// Lower is better; `ideal` maps to 1 and `poor` maps to 0.
    Latency { ideal: f64, poor: f64 },
}

pub fn normalize(raw: f64, kind: Normalization) -> f64 {
    match kind {
        Normalization::Rate => raw.clamp(0.0, 1.0),
        Normalization::Latency { ideal, poor } => {
            let span = poor - ideal;
            if span <= 0.0 {
                return if raw <= ideal { 1.0 } else { 0.0 };
            }
            ((poor - raw) / span).clamp(0.0, 1.0)
        }
    }
}

/// Builds a 0-1 ratio, returning `None` when the denominator is zero.
///
/// Callers treat `None` as "no activity" and define the dependent score as 0.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}
