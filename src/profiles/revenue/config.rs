//! Rule tables for revenue-stream optimization, version `revenue-v1`.
//!
//! | rule               | field  | trigger                  | severity                     |
//! |--------------------|--------|--------------------------|------------------------------|
//! | low-growth         | growth | < 0.5 x portfolio mean   | critical under 0.25x, else high |
//! | low-margin         | margin | < 0.8 x portfolio mean   | critical under 0.5x, else high  |
//! | low-arpc           | arpc   | < 0.7 x portfolio mean   | high under 0.4x, else medium    |
//! | small-stream       | revenue| < 500,000                | medium                       |
//!
//! Any change to a threshold, band, multiplier, or rule order requires a new
//! profile version.

use super::domain::RevenueField;
use crate::engine::{
    AnalysisProfile, Applicability, Condition, DiagnosticKind, DiagnosticRule, Difficulty,
    FallbackDiagnostic, FieldUpdate, ImpactFormula, ImpactUnit, Observation,
    RecommendationTemplate, Reference, RuleSet, Severity, SeverityBand, SeverityPolicy,
    TemplateContext,
};

pub const PROFILE_VERSION: &str = "revenue-v1";

pub const GROWTH_BOTTLENECK_FACTOR: f64 = 0.5;
pub const MARGIN_BOTTLENECK_FACTOR: f64 = 0.8;
pub const ARPC_BOTTLENECK_FACTOR: f64 = 0.7;
pub const SMALL_STREAM_REVENUE: f64 = 500_000.0;
pub const GROWTH_STRENGTH_FACTOR: f64 = 1.2;

pub const MARKETING_IMPACT: f64 = 0.15;
/// Applied to `revenue * margin%`: a 3% relative margin lift, with margin in percent.
pub const COST_OPTIMIZATION_IMPACT: f64 = 0.03 / 100.0;
pub const PRICING_IMPACT: f64 = 0.10;
pub const CHURN_IMPACT: f64 = 0.08;
pub const UPSELL_IMPACT: f64 = 0.15;
pub const UPSELL_REVENUE_CEILING: f64 = 1_000_000.0;
pub const SEGMENTATION_IMPACT: f64 = 0.12;

pub const FORECAST_COMPOUNDING: f64 = 1.2;
pub const GROWTH_STEP_PER_SELECTION: f64 = 2.0;
pub const COST_OPTIMIZATION_MARGIN_BONUS: f64 = 3.0;

pub const COST_OPTIMIZATION_ID: &str = "cost-optimization";

fn describe_low_growth(o: &Observation) -> String {
    format!(
        "This stream is growing at {:.1}%, well below the portfolio average of {:.1}%. There is likely untapped expansion potential.",
        o.value, o.reference
    )
}

fn describe_low_margin(o: &Observation) -> String {
    format!(
        "Current margin of {:.1}% trails the portfolio average of {:.1}%. The cost structure may need optimization.",
        o.value, o.reference
    )
}

fn describe_low_arpc(o: &Observation) -> String {
    let gap = if o.reference > 0.0 {
        (1.0 - o.value / o.reference) * 100.0
    } else {
        0.0
    };
    format!(
        "Revenue per customer of ${:.0} is {:.0}% below the portfolio average. Pricing or product mix needs attention.",
        o.value, gap
    )
}

fn describe_small_stream(o: &Observation) -> String {
    format!(
        "At ${:.0} this stream is below the ${:.0} scale threshold. Prove unit economics before expanding.",
        o.value, o.threshold
    )
}

fn describe_growth_leader(o: &Observation) -> String {
    format!(
        "Growth of {:.1}% outpaces the portfolio average of {:.1}%. Momentum supports further investment.",
        o.value, o.reference
    )
}

fn describe_healthy_margin(o: &Observation) -> String {
    format!(
        "Margin of {:.1}% beats the portfolio average of {:.1}%.",
        o.value, o.reference
    )
}

fn describe_marketing(context: &TemplateContext<'_>) -> String {
    format!(
        "Allocate additional marketing budget to this {} stream. A 30% lift in customer acquisition could drive revenue growth.",
        context.category.unwrap_or("revenue")
    )
}

fn describe_cost_optimization(_: &TemplateContext<'_>) -> String {
    "Review operational costs and target a 2-3% margin improvement through efficiency and automation.".to_string()
}

fn describe_pricing(_: &TemplateContext<'_>) -> String {
    "Introduce premium tiers or add-ons to raise revenue per customer. A 10% gain in pricing realization compounds quickly.".to_string()
}

fn describe_churn(_: &TemplateContext<'_>) -> String {
    "Run a retention program aimed at high-value subscribers. Even a 5% churn reduction protects meaningful revenue.".to_string()
}

fn describe_upsell(_: &TemplateContext<'_>) -> String {
    "Build a targeted upsell program for existing customers around complementary offerings to lift lifetime value.".to_string()
}

fn describe_segmentation(_: &TemplateContext<'_>) -> String {
    "Segment customers by profitability and engagement, then tailor offers and messaging per segment.".to_string()
}

const BOTTLENECK_RULES: &[DiagnosticRule<RevenueField>] = &[
    DiagnosticRule {
        id: "low-growth",
        kind: DiagnosticKind::Bottleneck,
        field: RevenueField::Growth,
        condition: Condition::Below,
        reference: Reference::Cohort {
            factor: GROWTH_BOTTLENECK_FACTOR,
        },
        severity: SeverityPolicy::Banded {
            bands: &[SeverityBand {
                below_ratio: 0.25,
                severity: Severity::Critical,
            }],
            otherwise: Severity::High,
        },
        title: "Below-Average Growth Rate",
        impact_area: "Revenue Growth",
        describe: describe_low_growth,
    },
    DiagnosticRule {
        id: "low-margin",
        kind: DiagnosticKind::Bottleneck,
        field: RevenueField::Margin,
        condition: Condition::Below,
        reference: Reference::Cohort {
            factor: MARGIN_BOTTLENECK_FACTOR,
        },
        severity: SeverityPolicy::Banded {
            bands: &[SeverityBand {
                below_ratio: 0.5,
                severity: Severity::Critical,
            }],
            otherwise: Severity::High,
        },
        title: "Margin Compression",
        impact_area: "Profitability",
        describe: describe_low_margin,
    },
    DiagnosticRule {
        id: "low-arpc",
        kind: DiagnosticKind::Bottleneck,
        field: RevenueField::AvgRevenuePerCustomer,
        condition: Condition::Below,
        reference: Reference::Cohort {
            factor: ARPC_BOTTLENECK_FACTOR,
        },
        severity: SeverityPolicy::Banded {
            bands: &[SeverityBand {
                below_ratio: 0.4,
                severity: Severity::High,
            }],
            otherwise: Severity::Medium,
        },
        title: "Low Revenue Per Customer",
        impact_area: "Unit Economics",
        describe: describe_low_arpc,
    },
    DiagnosticRule {
        id: "small-stream",
        kind: DiagnosticKind::Bottleneck,
        field: RevenueField::CurrentRevenue,
        condition: Condition::Below,
        reference: Reference::Fixed(SMALL_STREAM_REVENUE),
        severity: SeverityPolicy::Fixed(Severity::Medium),
        title: "Underdeveloped Revenue Stream",
        impact_area: "Scale",
        describe: describe_small_stream,
    },
];

const STRENGTH_RULES: &[DiagnosticRule<RevenueField>] = &[
    DiagnosticRule {
        id: "growth-leader",
        kind: DiagnosticKind::Strength,
        field: RevenueField::Growth,
        condition: Condition::Above,
        reference: Reference::Cohort {
            factor: GROWTH_STRENGTH_FACTOR,
        },
        severity: SeverityPolicy::Fixed(Severity::Low),
        title: "Outperforming Growth",
        impact_area: "Revenue Growth",
        describe: describe_growth_leader,
    },
    DiagnosticRule {
        id: "healthy-margin",
        kind: DiagnosticKind::Strength,
        field: RevenueField::Margin,
        condition: Condition::Above,
        reference: Reference::Cohort { factor: 1.0 },
        severity: SeverityPolicy::Fixed(Severity::Low),
        title: "Healthy Margin",
        impact_area: "Profitability",
        describe: describe_healthy_margin,
    },
];

const RECOMMENDATIONS: &[RecommendationTemplate<RevenueField>] = &[
    RecommendationTemplate {
        id: "expansion-marketing",
        title: "Increase Marketing Investment",
        applicability: Applicability::BelowCohort(RevenueField::Growth),
        impact: ImpactFormula::Fraction {
            field: RevenueField::CurrentRevenue,
            multiplier: MARKETING_IMPACT,
        },
        impact_unit: ImpactUnit::Currency,
        difficulty: Difficulty::Easy,
        timeframe_days: 90,
        action_label: "Create marketing campaign",
        describe: describe_marketing,
    },
    RecommendationTemplate {
        id: COST_OPTIMIZATION_ID,
        title: "Optimize Cost Structure",
        applicability: Applicability::BelowCohort(RevenueField::Margin),
        impact: ImpactFormula::Product {
            fields: &[RevenueField::CurrentRevenue, RevenueField::Margin],
            multiplier: COST_OPTIMIZATION_IMPACT,
        },
        impact_unit: ImpactUnit::Currency,
        difficulty: Difficulty::Medium,
        timeframe_days: 120,
        action_label: "Conduct cost analysis",
        describe: describe_cost_optimization,
    },
    RecommendationTemplate {
        id: "pricing-optimization",
        title: "Implement Tiered Pricing",
        applicability: Applicability::BelowCohort(RevenueField::AvgRevenuePerCustomer),
        impact: ImpactFormula::Fraction {
            field: RevenueField::CurrentRevenue,
            multiplier: PRICING_IMPACT,
        },
        impact_unit: ImpactUnit::Currency,
        difficulty: Difficulty::Medium,
        timeframe_days: 90,
        action_label: "Design pricing experiment",
        describe: describe_pricing,
    },
    RecommendationTemplate {
        id: "churn-reduction",
        title: "Reduce Churn Rate",
        applicability: Applicability::Category("subscription"),
        impact: ImpactFormula::Fraction {
            field: RevenueField::CurrentRevenue,
            multiplier: CHURN_IMPACT,
        },
        impact_unit: ImpactUnit::Currency,
        difficulty: Difficulty::Medium,
        timeframe_days: 180,
        action_label: "Launch retention program",
        describe: describe_churn,
    },
    RecommendationTemplate {
        id: "upsell-program",
        title: "Develop Cross-Sell Strategy",
        applicability: Applicability::Between {
            field: RevenueField::CurrentRevenue,
            above: 0.0,
            below: UPSELL_REVENUE_CEILING,
        },
        impact: ImpactFormula::Product {
            fields: &[RevenueField::Customers, RevenueField::AvgRevenuePerCustomer],
            multiplier: UPSELL_IMPACT,
        },
        impact_unit: ImpactUnit::Currency,
        difficulty: Difficulty::Easy,
        timeframe_days: 60,
        action_label: "Identify upsell opportunities",
        describe: describe_upsell,
    },
    RecommendationTemplate {
        id: "customer-segmentation",
        title: "Advanced Customer Segmentation",
        applicability: Applicability::Positive(RevenueField::CurrentRevenue),
        impact: ImpactFormula::Fraction {
            field: RevenueField::CurrentRevenue,
            multiplier: SEGMENTATION_IMPACT,
        },
        impact_unit: ImpactUnit::Currency,
        difficulty: Difficulty::Hard,
        timeframe_days: 150,
        action_label: "Build segmentation model",
        describe: describe_segmentation,
    },
];

const SIMULATION: &[FieldUpdate<RevenueField>] = &[
    FieldUpdate::AddTotalImpact {
        field: RevenueField::CurrentRevenue,
        factor: 1.0,
    },
    FieldUpdate::AddTotalImpact {
        field: RevenueField::ForecastRevenue,
        factor: FORECAST_COMPOUNDING,
    },
    FieldUpdate::StepPerSelection {
        field: RevenueField::Growth,
        step: GROWTH_STEP_PER_SELECTION,
    },
    FieldUpdate::BonusWhenSelected {
        field: RevenueField::Margin,
        recommendation: COST_OPTIMIZATION_ID,
        bonus: COST_OPTIMIZATION_MARGIN_BONUS,
        max: 100.0,
    },
];

pub const REVENUE_PROFILE: AnalysisProfile<RevenueField> = AnalysisProfile {
    version: PROFILE_VERSION,
    baseline_fields: &[
        RevenueField::Growth,
        RevenueField::Margin,
        RevenueField::AvgRevenuePerCustomer,
    ],
    findings: RuleSet {
        rules: BOTTLENECK_RULES,
        fallback: FallbackDiagnostic {
            id: "no-bottlenecks",
            title: "No Material Bottlenecks",
            description: "This stream meets or exceeds every portfolio benchmark and scale threshold.",
            impact_area: "Overall",
        },
    },
    strengths: RuleSet {
        rules: STRENGTH_RULES,
        fallback: FallbackDiagnostic {
            id: "steady-performer",
            title: "Steady Performer",
            description: "This stream tracks the portfolio without standout strengths.",
            impact_area: "Overall",
        },
    },
    recommendations: RECOMMENDATIONS,
    simulation: SIMULATION,
};
