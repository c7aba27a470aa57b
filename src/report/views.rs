use crate::engine::{
    Diagnostic, DiagnosticKind, Difficulty, FieldChange, ImpactUnit, Recommendation, Severity,
    SimulationResult,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticView {
    pub id: &'static str,
    pub kind: DiagnosticKind,
    pub kind_label: &'static str,
    pub severity: Severity,
    pub severity_label: &'static str,
    pub title: &'static str,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_field: Option<&'static str>,
    pub impact_area: &'static str,
}

impl From<&Diagnostic> for DiagnosticView {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            id: diagnostic.id,
            kind: diagnostic.kind,
            kind_label: diagnostic.kind.label(),
            severity: diagnostic.severity,
            severity_label: diagnostic.severity.label(),
            title: diagnostic.title,
            description: diagnostic.description.clone(),
            related_field: diagnostic.related_field,
            impact_area: diagnostic.impact_area,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub id: &'static str,
    pub title: &'static str,
    pub description: String,
    pub projected_impact: f64,
    pub impact_unit: ImpactUnit,
    pub difficulty: Difficulty,
    pub difficulty_label: &'static str,
    pub timeframe_days: u16,
    pub timeframe_label: String,
    pub action_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<&'static str>,
}

impl From<&Recommendation> for RecommendationView {
    fn from(rec: &Recommendation) -> Self {
        Self {
            id: rec.id,
            title: rec.title,
            description: rec.description.clone(),
            projected_impact: rec.projected_impact,
            impact_unit: rec.impact_unit,
            difficulty: rec.difficulty,
            difficulty_label: rec.difficulty.label(),
            timeframe_days: rec.timeframe_days,
            timeframe_label: rec.timeframe_label(),
            action_label: rec.action_label,
            addresses: rec.addresses,
        }
    }
}

/// Simulation outcome without the full hypothetical snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationView {
    pub applied: Vec<&'static str>,
    pub total_impact: f64,
    pub changes: Vec<FieldChange>,
}

impl<S> From<&SimulationResult<S>> for SimulationView {
    fn from(result: &SimulationResult<S>) -> Self {
        Self {
            applied: result.applied.clone(),
            total_impact: result.total_impact,
            changes: result.changes.clone(),
        }
    }
}
