//! Serializable report envelope shared by the CLI's text and JSON output.

pub mod views;

pub use views::{DiagnosticView, RecommendationView, SimulationView};

use crate::engine::{Analysis, BaselineView, DiagnosticKind, SimulationResult};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub evaluated_on: NaiveDate,
    pub subject_kind: &'static str,
    pub entity_id: String,
    pub profile_version: &'static str,
    pub baseline: BaselineView,
    pub diagnostics: Vec<DiagnosticView>,
    pub strengths: Vec<DiagnosticView>,
    pub recommendations: Vec<RecommendationView>,
    pub total_projected_impact: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationView>,
}

impl AnalysisReport {
    pub fn new(subject_kind: &'static str, analysis: &Analysis, evaluated_on: NaiveDate) -> Self {
        Self {
            evaluated_on,
            subject_kind,
            entity_id: analysis.entity_id.clone(),
            profile_version: analysis.profile_version,
            baseline: analysis.baseline.clone(),
            diagnostics: analysis.diagnostics.iter().map(DiagnosticView::from).collect(),
            strengths: analysis.strengths.iter().map(DiagnosticView::from).collect(),
            recommendations: analysis
                .recommendations
                .iter()
                .map(RecommendationView::from)
                .collect(),
            total_projected_impact: analysis.total_projected_impact(),
            simulation: None,
        }
    }

    pub fn with_simulation<S>(mut self, result: &SimulationResult<S>) -> Self {
        self.simulation = Some(SimulationView::from(result));
        self
    }

    /// Findings other than the "nothing found" marker.
    pub fn material_findings(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.kind != DiagnosticKind::Clear)
            .count()
    }

    /// One-line summary logged once a report is assembled.
    pub fn summary(&self) -> String {
        format!(
            "{} {}: {} finding(s), {} recommendation(s), projected impact {:.2}",
            self.subject_kind,
            self.entity_id,
            self.material_findings(),
            self.recommendations.len(),
            self.total_projected_impact
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AnalysisSettings;
    use crate::profiles::funding::{assess, BusinessStage, FundingProfile};

    fn evaluated_on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")
    }

    #[test]
    fn report_carries_labels_and_date() {
        let profile = FundingProfile {
            id: "biz-9".to_string(),
            business_name: "Northwind".to_string(),
            business_stage: BusinessStage::Startup,
            industry: String::new(),
            credit_score: 650,
            monthly_revenue: 10_000.0,
            collateral_value: 0.0,
            time_in_business_months: 30,
            eligibility_score: 75.0,
            readiness_score: 40.0,
            qualified_programs: Vec::new(),
        };
        let assessment = assess(&profile, &AnalysisSettings::default());

        let report = AnalysisReport::new("funding applicant", &assessment.analysis, evaluated_on());
        let json = serde_json::to_value(&report).expect("report serializes");

        assert_eq!(json["evaluated_on"], "2025-03-01");
        assert_eq!(json["profile_version"], "funding-v1");
        assert_eq!(json["diagnostics"][0]["id"], "credit-gap");
        assert_eq!(json["diagnostics"][0]["severity_label"], "High");
        assert_eq!(json["recommendations"][0]["timeframe_label"], "270 days");
        assert!(json.get("simulation").is_none());
        assert_eq!(report.material_findings(), 2);
        assert!(report.summary().starts_with("funding applicant biz-9: 2 finding(s)"));
    }
}
