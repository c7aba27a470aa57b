//! Engagement score model and team comparison rules, version `engagement-v1`.
//!
//! Score components, in order: response rate (rate), follow-up rate (rate),
//! response time (latency, ideal 5 min, poor 480 min). Scale 0-10.

use super::domain::EngagementField;
use crate::engine::{
    AnalysisProfile, ComponentSpec, Condition, DiagnosticKind, DiagnosticRule,
    FallbackDiagnostic, Normalization, Observation, Reference, RuleSet, ScoreModel, Severity,
    SeverityBand, SeverityPolicy,
};

pub const PROFILE_VERSION: &str = "engagement-v1";

pub const IDEAL_RESPONSE_MINUTES: f64 = 5.0;
pub const POOR_RESPONSE_MINUTES: f64 = 480.0;

pub const HIGHLY_ENGAGED_SCORE: f64 = 8.0;
pub const ENGAGED_SCORE: f64 = 5.0;

pub const RESPONSE_GAP_FACTOR: f64 = 0.7;
pub const FOLLOW_UP_GAP_FACTOR: f64 = 0.7;
pub const RESPONSE_LEADER_FACTOR: f64 = 1.2;

pub const ENGAGEMENT_SCORE_MODEL: ScoreModel = ScoreModel {
    version: PROFILE_VERSION,
    scale: 10.0,
    components: &[
        ComponentSpec {
            name: "response_rate",
            normalization: Normalization::Rate,
        },
        ComponentSpec {
            name: "follow_up_rate",
            normalization: Normalization::Rate,
        },
        ComponentSpec {
            name: "response_time",
            normalization: Normalization::Latency {
                ideal: IDEAL_RESPONSE_MINUTES,
                poor: POOR_RESPONSE_MINUTES,
            },
        },
    ],
};

fn describe_response_gap(o: &Observation) -> String {
    format!(
        "Responds to {:.1}% of outreach against a team average of {:.1}%.",
        o.value, o.reference
    )
}

fn describe_follow_up_gap(o: &Observation) -> String {
    format!(
        "Follow-up rate of {:.1}% lags the team average of {:.1}%.",
        o.value, o.reference
    )
}

fn describe_slow_response(o: &Observation) -> String {
    format!(
        "Average response time of {:.0} minutes exceeds the {:.0} minute tolerance.",
        o.value, o.threshold
    )
}

fn describe_response_leader(o: &Observation) -> String {
    format!(
        "Response rate of {:.1}% leads the team average of {:.1}%.",
        o.value, o.reference
    )
}

const FINDINGS: &[DiagnosticRule<EngagementField>] = &[
    DiagnosticRule {
        id: "low-response-rate",
        kind: DiagnosticKind::Bottleneck,
        field: EngagementField::ResponseRate,
        condition: Condition::Below,
        reference: Reference::Cohort {
            factor: RESPONSE_GAP_FACTOR,
        },
        severity: SeverityPolicy::Banded {
            bands: &[SeverityBand {
                below_ratio: 0.4,
                severity: Severity::High,
            }],
            otherwise: Severity::Medium,
        },
        title: "Below-Team Response Rate",
        impact_area: "Responsiveness",
        describe: describe_response_gap,
    },
    DiagnosticRule {
        id: "low-follow-up-rate",
        kind: DiagnosticKind::Bottleneck,
        field: EngagementField::FollowUpRate,
        condition: Condition::Below,
        reference: Reference::Cohort {
            factor: FOLLOW_UP_GAP_FACTOR,
        },
        severity: SeverityPolicy::Fixed(Severity::Medium),
        title: "Follow-Up Gap",
        impact_area: "Pipeline Coverage",
        describe: describe_follow_up_gap,
    },
    DiagnosticRule {
        id: "slow-responses",
        kind: DiagnosticKind::Risk,
        field: EngagementField::AvgResponseTimeMinutes,
        condition: Condition::Above,
        reference: Reference::Fixed(POOR_RESPONSE_MINUTES),
        severity: SeverityPolicy::Fixed(Severity::High),
        title: "Slow Response Time",
        impact_area: "Responsiveness",
        describe: describe_slow_response,
    },
];

const STRENGTHS: &[DiagnosticRule<EngagementField>] = &[DiagnosticRule {
    id: "response-leader",
    kind: DiagnosticKind::Strength,
    field: EngagementField::ResponseRate,
    condition: Condition::AtLeast,
    reference: Reference::Cohort {
        factor: RESPONSE_LEADER_FACTOR,
    },
    severity: SeverityPolicy::Fixed(Severity::Low),
    title: "Highly Responsive Contact",
    impact_area: "Responsiveness",
    describe: describe_response_leader,
}];

pub const ENGAGEMENT_PROFILE: AnalysisProfile<EngagementField> = AnalysisProfile {
    version: PROFILE_VERSION,
    baseline_fields: &[
        EngagementField::ResponseRate,
        EngagementField::FollowUpRate,
        EngagementField::AvgResponseTimeMinutes,
    ],
    findings: RuleSet {
        rules: FINDINGS,
        fallback: FallbackDiagnostic {
            id: "engagement-on-track",
            title: "Engagement On Track",
            description: "This contact keeps pace with the team on every tracked engagement metric.",
            impact_area: "Overall",
        },
    },
    strengths: RuleSet {
        rules: STRENGTHS,
        fallback: FallbackDiagnostic {
            id: "engagement-steady",
            title: "Steady Engagement",
            description: "No engagement metric stands out against the team.",
            impact_area: "Overall",
        },
    },
    recommendations: &[],
    simulation: &[],
};
