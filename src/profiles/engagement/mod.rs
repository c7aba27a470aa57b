//! Contact engagement scoring and team comparison.

pub mod config;
mod domain;

pub use config::{ENGAGEMENT_PROFILE, ENGAGEMENT_SCORE_MODEL};
pub use domain::{
    ContactEngagement, EngagementField, MAX_ENGAGEMENT_COUNT, MAX_RESPONSE_TIME_MINUTES,
};

use crate::engine::scoring::round_to_hundredth;
use crate::engine::{cohort_for, Analysis, AnalysisSettings, CohortMembership, ScoreResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementTier {
    HighlyEngaged,
    Engaged,
    Cooling,
}

impl EngagementTier {
    pub fn from_score(score: f64) -> Self {
        if score >= config::HIGHLY_ENGAGED_SCORE {
            Self::HighlyEngaged
        } else if score >= config::ENGAGED_SCORE {
            Self::Engaged
        } else {
            Self::Cooling
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HighlyEngaged => "Highly Engaged",
            Self::Engaged => "Engaged",
            Self::Cooling => "Cooling",
        }
    }
}

/// Score plus the derived rates shown next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementSummary {
    pub contact_id: String,
    /// Percentage rounded to two decimals; 0 when never contacted.
    pub response_rate_pct: f64,
    pub follow_up_rate_pct: f64,
    pub score: ScoreResult,
    pub tier: EngagementTier,
}

/// Scores a contact on the `engagement-v1` model.
///
/// A contact that was never reached scores exactly 0.
pub fn score(contact: &ContactEngagement) -> ScoreResult {
    match (contact.response_ratio(), contact.follow_up_ratio()) {
        (Some(response), Some(follow_up)) => ENGAGEMENT_SCORE_MODEL.evaluate(&[
            response,
            follow_up,
            contact.avg_response_time_minutes,
        ]),
        _ => ENGAGEMENT_SCORE_MODEL.without_activity(),
    }
}

pub fn summarize(contact: &ContactEngagement) -> EngagementSummary {
    let score = score(contact);
    let pct = |ratio: Option<f64>| round_to_hundredth(ratio.unwrap_or(0.0) * 100.0);

    EngagementSummary {
        contact_id: contact.contact_id.clone(),
        response_rate_pct: pct(contact.response_ratio()),
        follow_up_rate_pct: pct(contact.follow_up_ratio()),
        tier: EngagementTier::from_score(score.score),
        score,
    }
}

/// Compares `contact` with the rest of `team`; the contact never counts toward its own average.
pub fn analyze(
    contact: &ContactEngagement,
    team: &[ContactEngagement],
    settings: &AnalysisSettings,
) -> Analysis {
    let peers = cohort_for(&contact.contact_id, team, CohortMembership::ExcludeSubject);
    ENGAGEMENT_PROFILE.analyze(contact, &peers, settings)
}
