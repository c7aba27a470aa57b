use super::normalize::{normalize, Normalization};
use serde::Serialize;

/// A fixed, versioned component set and output scale for one entity kind.
///
/// Adding, removing, or reordering components changes what the score means, so
/// any such change must come with a new `version`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreModel {
    pub version: &'static str,
    pub scale: f64,
    pub components: &'static [ComponentSpec],
}

/// One documented input of a [`ScoreModel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentSpec {
    pub name: &'static str,
    pub normalization: Normalization,
}

/// Normalized contribution kept for explainability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub name: &'static str,
    pub raw: f64,
    pub normalized: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub model_version: &'static str,
    pub score: f64,
    pub scale: f64,
    /// False when the score fell back to zero because a denominator was zero.
    pub has_activity: bool,
    pub components: Vec<ScoreComponent>,
}

impl ScoreModel {
    /// Normalizes `raw_values` (one per component, in model order) and scores them.
    ///
    /// Panics in debug builds if the caller passes the wrong number of values.
    pub fn evaluate(&self, raw_values: &[f64]) -> ScoreResult {
        debug_assert_eq!(
            raw_values.len(),
            self.components.len(),
            "score model {} expects {} components",
            self.version,
            self.components.len()
        );

        let components = self
            .components
            .iter()
            .zip(raw_values)
            .map(|(spec, raw)| ScoreComponent {
                name: spec.name,
                raw: *raw,
                normalized: normalize(*raw, spec.normalization),
            })
            .collect();

        self.score(components)
    }

    /// Averages already-normalized components onto the model scale.
    pub fn score(&self, components: Vec<ScoreComponent>) -> ScoreResult {
        let score = if components.is_empty() {
            0.0
        } else {
            let mean = components.iter().map(|c| c.normalized).sum::<f64>()
                / components.len() as f64;
            round_to_tenth(mean * self.scale)
        };

        ScoreResult {
            model_version: self.version,
            score,
            scale: self.scale,
            has_activity: true,
            components,
        }
    }

    /// Defined result when the rate denominator is zero.
    pub fn without_activity(&self) -> ScoreResult {
        ScoreResult {
            model_version: self.version,
            score: 0.0,
            scale: self.scale,
            has_activity: false,
            components: Vec::new(),
        }
    }
}

/// Rounds to one decimal place, half away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds to two decimal places, half away from zero.
pub fn round_to_hundredth(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
