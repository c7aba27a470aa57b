//! Entity-agnostic scoring, cohort comparison, diagnostics, recommendations,
//! and selection simulation.
//!
//! Every function here is pure: inputs are borrowed immutably and each call
//! returns fresh values. Per-kind behavior (fields, thresholds, multipliers)
//! arrives through an [`AnalysisProfile`] so the algorithms stay shared.

pub mod cohort;
pub mod diagnostics;
pub mod domain;
pub mod normalize;
pub mod recommendations;
pub mod scoring;
pub mod simulation;

pub use cohort::{baseline, cohort_for, BaselineView, CohortBaseline, CohortMembership};
pub use diagnostics::{
    detect, sort_by_severity, Condition, DiagnosticRule, FallbackDiagnostic, Observation,
    Reference, RuleSet, SeverityBand, SeverityPolicy,
};
pub use domain::{
    Diagnostic, DiagnosticKind, Difficulty, EntitySnapshot, ImpactUnit, MetricField,
    Recommendation, Severity,
};
pub use normalize::{normalize, ratio, Normalization};
pub use recommendations::{
    generate, rank_by_impact, total_projected_impact, Applicability, ImpactFormula,
    RecommendationTemplate, TemplateContext, DEFAULT_RECOMMENDATION_LIMIT,
};
pub use scoring::{ComponentSpec, ScoreComponent, ScoreModel, ScoreResult};
pub use simulation::{apply, select_by_id, FieldChange, FieldUpdate, SimulationError, SimulationResult};

use serde::Serialize;
use tracing::debug;

/// Versioned rule tables for one entity kind.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisProfile<F: 'static> {
    pub version: &'static str,
    /// Fields averaged across the cohort before detection.
    pub baseline_fields: &'static [F],
    /// Bottleneck or risk rules.
    pub findings: RuleSet<F>,
    pub strengths: RuleSet<F>,
    pub recommendations: &'static [RecommendationTemplate<F>],
    pub simulation: &'static [FieldUpdate<F>],
}

/// Caller-controlled knobs that sit outside the versioned rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub recommendation_limit: usize,
    /// Applies [`rank_by_impact`] after truncation.
    pub rank_by_impact: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            rank_by_impact: false,
        }
    }
}

/// Output of one analysis pass over a subject and its peers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub entity_id: String,
    pub profile_version: &'static str,
    pub baseline: BaselineView,
    pub diagnostics: Vec<Diagnostic>,
    pub strengths: Vec<Diagnostic>,
    pub recommendations: Vec<Recommendation>,
}

impl Analysis {
    pub fn total_projected_impact(&self) -> f64 {
        total_projected_impact(&self.recommendations)
    }
}

impl<F: MetricField> AnalysisProfile<F> {
    /// Baseline, detection, and recommendation for `subject` against `peers`.
    ///
    /// `peers` is used as given; cohort membership is decided by the caller.
    pub fn analyze<S>(&self, subject: &S, peers: &[&S], settings: &AnalysisSettings) -> Analysis
    where
        S: EntitySnapshot<Field = F>,
    {
        let baseline = CohortBaseline::compute(peers, self.baseline_fields);
        let diagnostics = detect(subject, &baseline, &self.findings);
        let strengths = detect(subject, &baseline, &self.strengths);

        let mut recommendations = generate(
            subject,
            &baseline,
            &diagnostics,
            self.recommendations,
            settings.recommendation_limit,
        );
        if settings.rank_by_impact {
            recommendations = rank_by_impact(recommendations);
        }

        debug!(
            profile = self.version,
            entity = subject.entity_id(),
            peers = baseline.peer_count(),
            diagnostics = diagnostics.len(),
            recommendations = recommendations.len(),
            "analysis complete"
        );

        Analysis {
            entity_id: subject.entity_id().to_string(),
            profile_version: self.version,
            baseline: baseline.to_view(),
            diagnostics,
            strengths,
            recommendations,
        }
    }

    /// Applies the profile's field-update rules to a copy of `subject`.
    pub fn simulate<S>(
        &self,
        subject: &S,
        selected: &[Recommendation],
    ) -> Result<SimulationResult<S>, SimulationError>
    where
        S: EntitySnapshot<Field = F>,
    {
        apply(subject, selected, self.simulation)
    }
}
