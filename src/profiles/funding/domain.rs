use crate::engine::{EntitySnapshot, MetricField};
use crate::input::{ensure_non_negative, ensure_present, ensure_range, ValidationError};
use serde::{Deserialize, Serialize};

pub const MIN_CREDIT_SCORE: u16 = 300;
pub const MAX_CREDIT_SCORE: u16 = 850;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStage {
    Startup,
    Early,
    Growth,
    Mature,
}

impl BusinessStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Startup => "Startup",
            Self::Early => "Early Stage",
            Self::Growth => "Growth Stage",
            Self::Mature => "Mature",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FundingType {
    BankLoan,
    GovernmentGrant,
    Microfinance,
    AngelCapital,
    VentureCapital,
    Crowdfunding,
    Cooperative,
}

impl FundingType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BankLoan => "Bank Loan",
            Self::GovernmentGrant => "Government Grant",
            Self::Microfinance => "Microfinance",
            Self::AngelCapital => "Angel Capital",
            Self::VentureCapital => "Venture Capital",
            Self::Crowdfunding => "Crowdfunding",
            Self::Cooperative => "Cooperative",
        }
    }
}

/// A financing product an applicant can be pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FundingOption {
    pub id: &'static str,
    pub name: &'static str,
    pub funding_type: FundingType,
    pub provider: &'static str,
    pub min_amount: f64,
    pub max_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingField {
    EligibilityScore,
    ReadinessScore,
    CreditScore,
    MonthlyRevenue,
    CollateralValue,
    TimeInBusinessMonths,
    QualifiedPrograms,
}

impl MetricField for FundingField {
    fn key(self) -> &'static str {
        match self {
            Self::EligibilityScore => "eligibility_score",
            Self::ReadinessScore => "readiness_score",
            Self::CreditScore => "credit_score",
            Self::MonthlyRevenue => "monthly_revenue",
            Self::CollateralValue => "collateral_value",
            Self::TimeInBusinessMonths => "time_in_business_months",
            Self::QualifiedPrograms => "qualified_programs",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::EligibilityScore => "Eligibility Score",
            Self::ReadinessScore => "Readiness Score",
            Self::CreditScore => "Credit Score",
            Self::MonthlyRevenue => "Monthly Revenue",
            Self::CollateralValue => "Collateral Value",
            Self::TimeInBusinessMonths => "Time in Business (months)",
            Self::QualifiedPrograms => "Qualified Programs",
        }
    }
}

/// Funding applicant profile as supplied by the eligibility intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingProfile {
    pub id: String,
    pub business_name: String,
    pub business_stage: BusinessStage,
    #[serde(default)]
    pub industry: String,
    pub credit_score: u16,
    pub monthly_revenue: f64,
    pub collateral_value: f64,
    pub time_in_business_months: u32,
    /// 0-100, produced upstream by the eligibility check.
    pub eligibility_score: f64,
    /// 0-100, produced upstream by the strategy assessment.
    pub readiness_score: f64,
    #[serde(default)]
    pub qualified_programs: Vec<String>,
}

impl FundingProfile {
    pub fn annual_revenue(&self) -> f64 {
        self.monthly_revenue * 12.0
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_present("id", &self.id)?;
        ensure_range(
            "credit_score",
            self.credit_score as f64,
            MIN_CREDIT_SCORE as f64,
            MAX_CREDIT_SCORE as f64,
        )?;
        ensure_non_negative("monthly_revenue", self.monthly_revenue)?;
        ensure_non_negative("collateral_value", self.collateral_value)?;
        ensure_range("eligibility_score", self.eligibility_score, 0.0, 100.0)?;
        ensure_range("readiness_score", self.readiness_score, 0.0, 100.0)?;
        Ok(())
    }
}

impl EntitySnapshot for FundingProfile {
    type Field = FundingField;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn metric(&self, field: FundingField) -> Option<f64> {
        let value = match field {
            FundingField::EligibilityScore => self.eligibility_score,
            FundingField::ReadinessScore => self.readiness_score,
            FundingField::CreditScore => self.credit_score as f64,
            FundingField::MonthlyRevenue => self.monthly_revenue,
            FundingField::CollateralValue => self.collateral_value,
            FundingField::TimeInBusinessMonths => self.time_in_business_months as f64,
            FundingField::QualifiedPrograms => self.qualified_programs.len() as f64,
        };
        Some(value)
    }

    /// `QualifiedPrograms` is derived from the program list and cannot be set.
    fn set_metric(&mut self, field: FundingField, value: f64) {
        match field {
            FundingField::EligibilityScore => self.eligibility_score = value,
            FundingField::ReadinessScore => self.readiness_score = value,
            FundingField::CreditScore => {
                self.credit_score = value
                    .round()
                    .clamp(MIN_CREDIT_SCORE as f64, MAX_CREDIT_SCORE as f64)
                    as u16
            }
            FundingField::MonthlyRevenue => self.monthly_revenue = value,
            FundingField::CollateralValue => self.collateral_value = value,
            FundingField::TimeInBusinessMonths => {
                self.time_in_business_months = value.max(0.0).round() as u32
            }
            FundingField::QualifiedPrograms => {}
        }
    }

    fn category(&self) -> Option<&str> {
        Some(match self.business_stage {
            BusinessStage::Startup => "startup",
            BusinessStage::Early => "early",
            BusinessStage::Growth => "growth",
            BusinessStage::Mature => "mature",
        })
    }
}
