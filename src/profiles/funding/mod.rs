//! Funding readiness: lending risks, strengths, and capital guidance.

pub mod config;
mod domain;

pub use config::FUNDING_PROFILE;
pub use domain::{
    BusinessStage, FundingField, FundingOption, FundingProfile, FundingType, MAX_CREDIT_SCORE,
    MIN_CREDIT_SCORE,
};

use crate::engine::scoring::round_to_hundredth;
use crate::engine::{Analysis, AnalysisSettings};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLevel {
    Ready,
    NearlyReady,
    NeedsPreparation,
}

impl ReadinessLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= config::READY_SCORE {
            Self::Ready
        } else if score >= config::NEARLY_READY_SCORE {
            Self::NearlyReady
        } else {
            Self::NeedsPreparation
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::NearlyReady => "Nearly Ready",
            Self::NeedsPreparation => "Needs Preparation",
        }
    }
}

/// Suggested raise, sized from annual revenue and business stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalGuidance {
    pub stage_factor: f64,
    pub target: f64,
    pub range_low: f64,
    pub range_high: f64,
    pub uses: &'static [&'static str],
}

impl CapitalGuidance {
    pub fn for_profile(profile: &FundingProfile) -> Self {
        let stage_factor = config::stage_factor(profile.business_stage);
        let target = round_to_hundredth(profile.annual_revenue() * stage_factor);
        Self {
            stage_factor,
            target,
            range_low: round_to_hundredth(target * config::CAPITAL_RANGE_LOW),
            range_high: round_to_hundredth(target * config::CAPITAL_RANGE_HIGH),
            uses: config::CAPITAL_USES,
        }
    }

    /// Mature businesses get no stage-based raise suggestion.
    pub fn is_applicable(&self) -> bool {
        self.target > 0.0
    }
}

/// Picks up to two options whose type suits `stage`, keeping catalog order.
/// When fewer than two match, the first two catalog entries are offered instead.
pub fn recommend_funding(stage: BusinessStage, catalog: &[FundingOption]) -> Vec<FundingOption> {
    let suited = config::stage_funding_types(stage);
    let matched: Vec<FundingOption> = catalog
        .iter()
        .filter(|option| suited.contains(&option.funding_type))
        .take(config::RECOMMENDED_FUNDING_COUNT)
        .copied()
        .collect();

    if matched.len() < config::RECOMMENDED_FUNDING_COUNT {
        return catalog
            .iter()
            .take(config::RECOMMENDED_FUNDING_COUNT)
            .copied()
            .collect();
    }
    matched
}

/// Base lender documents followed by the industry-specific ones.
pub fn documentation_checklist(industry: &str) -> Vec<&'static str> {
    config::BASE_DOCUMENTS
        .iter()
        .chain(config::industry_documents(industry))
        .copied()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingAssessment {
    pub business_name: String,
    pub stage: BusinessStage,
    pub readiness: ReadinessLevel,
    pub capital: CapitalGuidance,
    pub recommended_funding: Vec<FundingOption>,
    pub documents: Vec<&'static str>,
    pub analysis: Analysis,
}

/// Assesses a single applicant. Funding rules use fixed thresholds, so no peers are consulted.
pub fn assess(profile: &FundingProfile, settings: &AnalysisSettings) -> FundingAssessment {
    FundingAssessment {
        business_name: profile.business_name.clone(),
        stage: profile.business_stage,
        readiness: ReadinessLevel::from_score(profile.readiness_score),
        capital: CapitalGuidance::for_profile(profile),
        recommended_funding: recommend_funding(profile.business_stage, config::FUNDING_CATALOG),
        documents: documentation_checklist(&profile.industry),
        analysis: FUNDING_PROFILE.analyze(profile, &[], settings),
    }
}
