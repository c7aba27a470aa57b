//! Funding readiness rules, version `funding-v1`.
//!
//! Every rule compares the applicant against fixed lending thresholds or
//! against its own revenue; there is no peer cohort.

use super::domain::{BusinessStage, FundingField, FundingOption, FundingType};
use crate::engine::{
    AnalysisProfile, Applicability, Condition, DiagnosticKind, DiagnosticRule, Difficulty,
    FallbackDiagnostic, ImpactFormula, ImpactUnit, Observation, RecommendationTemplate,
    Reference, RuleSet, Severity, SeverityPolicy, TemplateContext,
};

pub const PROFILE_VERSION: &str = "funding-v1";

pub const READY_SCORE: f64 = 80.0;
pub const NEARLY_READY_SCORE: f64 = 60.0;

pub const MIN_ELIGIBILITY: f64 = 70.0;
pub const MIN_CREDIT: f64 = 700.0;
pub const MIN_HISTORY_MONTHS: f64 = 24.0;
/// Collateral is expected to cover this many months of revenue.
pub const MIN_COLLATERAL_MONTHS: f64 = 3.0;

pub const STRONG_ELIGIBILITY: f64 = 80.0;
pub const STRONG_CREDIT: f64 = 750.0;
pub const STRONG_MONTHLY_REVENUE: f64 = 100_000.0;
pub const STRONG_COLLATERAL_MONTHS: f64 = 12.0;
pub const BROAD_PROGRAM_ACCESS: f64 = 4.0;

/// Guidance range around the target amount.
pub const CAPITAL_RANGE_LOW: f64 = 0.75;
pub const CAPITAL_RANGE_HIGH: f64 = 1.25;

pub const CAPITAL_USES: &[&str] = &[
    "Operational expansion and inventory",
    "Team hiring and retention",
    "Technology and equipment upgrades",
    "Marketing and customer acquisition",
    "Working capital buffer",
];

/// Share of annual revenue worth raising at each stage.
pub const fn stage_factor(stage: BusinessStage) -> f64 {
    match stage {
        BusinessStage::Startup => 0.5,
        BusinessStage::Early => 0.3,
        BusinessStage::Growth => 0.15,
        BusinessStage::Mature => 0.0,
    }
}

/// Funding types suited to each stage, in preference order.
pub const fn stage_funding_types(stage: BusinessStage) -> &'static [FundingType] {
    match stage {
        BusinessStage::Startup => &[
            FundingType::AngelCapital,
            FundingType::Crowdfunding,
            FundingType::GovernmentGrant,
        ],
        BusinessStage::Early => &[
            FundingType::AngelCapital,
            FundingType::BankLoan,
            FundingType::GovernmentGrant,
        ],
        BusinessStage::Growth => &[
            FundingType::VentureCapital,
            FundingType::BankLoan,
            FundingType::AngelCapital,
        ],
        BusinessStage::Mature => &[FundingType::BankLoan, FundingType::Cooperative],
    }
}

pub const RECOMMENDED_FUNDING_COUNT: usize = 2;

pub const FUNDING_CATALOG: &[FundingOption] = &[
    FundingOption {
        id: "sba-7a",
        name: "SBA 7(a) General Business Loan",
        funding_type: FundingType::GovernmentGrant,
        provider: "U.S. Small Business Administration",
        min_amount: 25_000.0,
        max_amount: 5_000_000.0,
    },
    FundingOption {
        id: "business-line-of-credit",
        name: "Business Line of Credit",
        funding_type: FundingType::BankLoan,
        provider: "First National Bank",
        min_amount: 10_000.0,
        max_amount: 1_000_000.0,
    },
    FundingOption {
        id: "cdfi-microloan",
        name: "Microfinance Business Loan",
        funding_type: FundingType::Microfinance,
        provider: "Community Development Financial Institution",
        min_amount: 500.0,
        max_amount: 50_000.0,
    },
    FundingOption {
        id: "angel-network",
        name: "Angel Investment Network",
        funding_type: FundingType::AngelCapital,
        provider: "Tech Angels Group",
        min_amount: 25_000.0,
        max_amount: 500_000.0,
    },
];

pub const BASE_DOCUMENTS: &[&str] = &[
    "12 months of business bank statements",
    "Business plan or pitch deck",
    "Tax ID documentation",
    "Cashflow projections (3-5 years)",
    "Credit history summary",
];

/// Extra paperwork lenders ask for by industry. Unlisted industries get the
/// generic compliance set.
pub fn industry_documents(industry: &str) -> &'static [&'static str] {
    match industry.trim().to_ascii_lowercase().as_str() {
        "technology" => &["Product roadmap", "User acquisition metrics"],
        "retail" => &["Inventory documents", "POS system reports"],
        "manufacturing" => &["Equipment list and valuation", "Supply chain documentation"],
        "services" => &["Client contracts", "Service agreements"],
        _ => &["Industry certifications", "Compliance documentation"],
    }
}

pub const LOW_ELIGIBILITY_ID: &str = "low-eligibility";
pub const CREDIT_GAP_ID: &str = "credit-gap";
pub const LIMITED_HISTORY_ID: &str = "limited-history";
pub const THIN_COLLATERAL_ID: &str = "thin-collateral";

fn describe_low_eligibility(o: &Observation) -> String {
    format!(
        "Eligibility score of {:.0} is below the {:.0} most lenders expect. Several programs may decline the application.",
        o.value, o.threshold
    )
}

fn describe_credit_gap(o: &Observation) -> String {
    format!(
        "Credit score of {:.0} sits under the {:.0} preferred threshold, limiting access to the best rates.",
        o.value, o.threshold
    )
}

fn describe_limited_history(o: &Observation) -> String {
    format!(
        "{:.0} months in business is short of the {:.0} month operating history most lenders require.",
        o.value, o.threshold
    )
}

fn describe_thin_collateral(o: &Observation) -> String {
    format!(
        "Collateral of ${:.0} covers less than three months of revenue (${:.0}).",
        o.value, o.threshold
    )
}

fn describe_strong_eligibility(o: &Observation) -> String {
    format!("Eligibility score of {:.0} qualifies for most programs.", o.value)
}

fn describe_strong_credit(o: &Observation) -> String {
    format!("Credit score of {:.0} unlocks preferred lending rates.", o.value)
}

fn describe_strong_revenue(o: &Observation) -> String {
    format!(
        "Monthly revenue of ${:.0} demonstrates repayment capacity.",
        o.value
    )
}

fn describe_established(o: &Observation) -> String {
    format!("{:.0} months of operating history shows stability.", o.value)
}

fn describe_strong_collateral(o: &Observation) -> String {
    format!(
        "Collateral of ${:.0} covers a full year of revenue.",
        o.value
    )
}

fn describe_program_access(o: &Observation) -> String {
    format!(
        "Qualifies for {:.0} funding programs, leaving room to compare terms.",
        o.value
    )
}

fn describe_improve_eligibility(_: &TemplateContext<'_>) -> String {
    "Improve business financials and documentation before applying. Clean statements raise the eligibility score fastest.".to_string()
}

fn describe_build_credit(_: &TemplateContext<'_>) -> String {
    "Build credit over the next 6-12 months by paying down balances and keeping utilization low.".to_string()
}

fn describe_document_growth(_: &TemplateContext<'_>) -> String {
    "Document consistent growth with monthly financials and customer contracts to offset the short operating history.".to_string()
}

fn describe_build_collateral(_: &TemplateContext<'_>) -> String {
    "Acquire additional business assets or explore unsecured programs to cover the collateral gap.".to_string()
}

const RISK_RULES: &[DiagnosticRule<FundingField>] = &[
    DiagnosticRule {
        id: LOW_ELIGIBILITY_ID,
        kind: DiagnosticKind::Risk,
        field: FundingField::EligibilityScore,
        condition: Condition::Below,
        reference: Reference::Fixed(MIN_ELIGIBILITY),
        severity: SeverityPolicy::Fixed(Severity::High),
        title: "Low Eligibility Score",
        impact_area: "Eligibility",
        describe: describe_low_eligibility,
    },
    DiagnosticRule {
        id: CREDIT_GAP_ID,
        kind: DiagnosticKind::Risk,
        field: FundingField::CreditScore,
        condition: Condition::Below,
        reference: Reference::Fixed(MIN_CREDIT),
        severity: SeverityPolicy::Fixed(Severity::High),
        title: "Credit Score Below Preferred Range",
        impact_area: "Credit",
        describe: describe_credit_gap,
    },
    DiagnosticRule {
        id: LIMITED_HISTORY_ID,
        kind: DiagnosticKind::Risk,
        field: FundingField::TimeInBusinessMonths,
        condition: Condition::Below,
        reference: Reference::Fixed(MIN_HISTORY_MONTHS),
        severity: SeverityPolicy::Fixed(Severity::Medium),
        title: "Limited Operating History",
        impact_area: "Track Record",
        describe: describe_limited_history,
    },
    DiagnosticRule {
        id: THIN_COLLATERAL_ID,
        kind: DiagnosticKind::Risk,
        field: FundingField::CollateralValue,
        condition: Condition::Below,
        reference: Reference::Field {
            field: FundingField::MonthlyRevenue,
            multiple: MIN_COLLATERAL_MONTHS,
        },
        severity: SeverityPolicy::Fixed(Severity::Medium),
        title: "Insufficient Collateral",
        impact_area: "Collateral",
        describe: describe_thin_collateral,
    },
];

const STRENGTH_RULES: &[DiagnosticRule<FundingField>] = &[
    DiagnosticRule {
        id: "strong-eligibility",
        kind: DiagnosticKind::Strength,
        field: FundingField::EligibilityScore,
        condition: Condition::AtLeast,
        reference: Reference::Fixed(STRONG_ELIGIBILITY),
        severity: SeverityPolicy::Fixed(Severity::Low),
        title: "Strong Eligibility",
        impact_area: "Eligibility",
        describe: describe_strong_eligibility,
    },
    DiagnosticRule {
        id: "excellent-credit",
        kind: DiagnosticKind::Strength,
        field: FundingField::CreditScore,
        condition: Condition::AtLeast,
        reference: Reference::Fixed(STRONG_CREDIT),
        severity: SeverityPolicy::Fixed(Severity::Low),
        title: "Excellent Credit",
        impact_area: "Credit",
        describe: describe_strong_credit,
    },
    DiagnosticRule {
        id: "strong-revenue",
        kind: DiagnosticKind::Strength,
        field: FundingField::MonthlyRevenue,
        condition: Condition::AtLeast,
        reference: Reference::Fixed(STRONG_MONTHLY_REVENUE),
        severity: SeverityPolicy::Fixed(Severity::Low),
        title: "Strong Revenue",
        impact_area: "Cash Flow",
        describe: describe_strong_revenue,
    },
    DiagnosticRule {
        id: "established-business",
        kind: DiagnosticKind::Strength,
        field: FundingField::TimeInBusinessMonths,
        condition: Condition::AtLeast,
        reference: Reference::Fixed(MIN_HISTORY_MONTHS),
        severity: SeverityPolicy::Fixed(Severity::Low),
        title: "Established Business",
        impact_area: "Track Record",
        describe: describe_established,
    },
    DiagnosticRule {
        id: "strong-collateral",
        kind: DiagnosticKind::Strength,
        field: FundingField::CollateralValue,
        condition: Condition::AtLeast,
        reference: Reference::Field {
            field: FundingField::MonthlyRevenue,
            multiple: STRONG_COLLATERAL_MONTHS,
        },
        severity: SeverityPolicy::Fixed(Severity::Low),
        title: "Strong Collateral Position",
        impact_area: "Collateral",
        describe: describe_strong_collateral,
    },
    DiagnosticRule {
        id: "broad-program-access",
        kind: DiagnosticKind::Strength,
        field: FundingField::QualifiedPrograms,
        condition: Condition::AtLeast,
        reference: Reference::Fixed(BROAD_PROGRAM_ACCESS),
        severity: SeverityPolicy::Fixed(Severity::Low),
        title: "Broad Program Access",
        impact_area: "Options",
        describe: describe_program_access,
    },
];

const RECOMMENDATIONS: &[RecommendationTemplate<FundingField>] = &[
    RecommendationTemplate {
        id: "improve-eligibility",
        title: "Strengthen Eligibility Profile",
        applicability: Applicability::Diagnostic(LOW_ELIGIBILITY_ID),
        impact: ImpactFormula::Unquantified,
        impact_unit: ImpactUnit::Points,
        difficulty: Difficulty::Medium,
        timeframe_days: 90,
        action_label: "Prepare financial statements",
        describe: describe_improve_eligibility,
    },
    RecommendationTemplate {
        id: "build-credit",
        title: "Build Business Credit",
        applicability: Applicability::Diagnostic(CREDIT_GAP_ID),
        impact: ImpactFormula::Unquantified,
        impact_unit: ImpactUnit::Points,
        difficulty: Difficulty::Hard,
        timeframe_days: 270,
        action_label: "Start credit plan",
        describe: describe_build_credit,
    },
    RecommendationTemplate {
        id: "document-growth",
        title: "Document Growth Trajectory",
        applicability: Applicability::Diagnostic(LIMITED_HISTORY_ID),
        impact: ImpactFormula::Unquantified,
        impact_unit: ImpactUnit::Points,
        difficulty: Difficulty::Easy,
        timeframe_days: 60,
        action_label: "Assemble growth records",
        describe: describe_document_growth,
    },
    RecommendationTemplate {
        id: "build-collateral",
        title: "Close the Collateral Gap",
        applicability: Applicability::Diagnostic(THIN_COLLATERAL_ID),
        impact: ImpactFormula::Unquantified,
        impact_unit: ImpactUnit::Points,
        difficulty: Difficulty::Hard,
        timeframe_days: 180,
        action_label: "Review asset options",
        describe: describe_build_collateral,
    },
];

pub const FUNDING_PROFILE: AnalysisProfile<FundingField> = AnalysisProfile {
    version: PROFILE_VERSION,
    baseline_fields: &[],
    findings: RuleSet {
        rules: RISK_RULES,
        fallback: FallbackDiagnostic {
            id: "no-major-risks",
            title: "No Major Risks Identified",
            description: "The applicant clears every lending threshold that is tracked.",
            impact_area: "Overall",
        },
    },
    strengths: RuleSet {
        rules: STRENGTH_RULES,
        fallback: FallbackDiagnostic {
            id: "solid-foundation",
            title: "Solid Business Foundation",
            description: "No single metric stands out, but nothing blocks an application either.",
            impact_area: "Overall",
        },
    },
    recommendations: RECOMMENDATIONS,
    simulation: &[],
};
