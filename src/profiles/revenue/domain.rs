use crate::engine::{EntitySnapshot, MetricField};
use crate::input::{
    ensure_finite, ensure_non_negative, ensure_present, ensure_range, ValidationError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamType {
    Subscription,
    OneTime,
    UsageBased,
    Commission,
    Advertising,
}

impl StreamType {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::OneTime => "one-time",
            Self::UsageBased => "usage-based",
            Self::Commission => "commission",
            Self::Advertising => "advertising",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Subscription => "Subscription",
            Self::OneTime => "One-Time",
            Self::UsageBased => "Usage-Based",
            Self::Commission => "Commission",
            Self::Advertising => "Advertising",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueField {
    CurrentRevenue,
    ForecastRevenue,
    Growth,
    Margin,
    Customers,
    AvgRevenuePerCustomer,
}

impl MetricField for RevenueField {
    fn key(self) -> &'static str {
        match self {
            Self::CurrentRevenue => "current_revenue",
            Self::ForecastRevenue => "forecast_revenue",
            Self::Growth => "growth",
            Self::Margin => "margin",
            Self::Customers => "customers",
            Self::AvgRevenuePerCustomer => "avg_revenue_per_customer",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::CurrentRevenue => "Current Revenue",
            Self::ForecastRevenue => "Forecast Revenue",
            Self::Growth => "Growth (%)",
            Self::Margin => "Margin (%)",
            Self::Customers => "Customers",
            Self::AvgRevenuePerCustomer => "Avg Revenue per Customer",
        }
    }
}

/// One revenue stream in a portfolio.
///
/// Growth may be negative. Margin is a percentage in [0, 100]. Optional
/// metrics are `None` when the source left them blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueStream {
    pub id: String,
    pub name: String,
    pub stream_type: StreamType,
    pub current_revenue: f64,
    pub forecast_revenue: f64,
    #[serde(default)]
    pub growth: Option<f64>,
    #[serde(default)]
    pub margin: Option<f64>,
    pub customers: u64,
    #[serde(default)]
    pub avg_revenue_per_customer: Option<f64>,
}

impl RevenueStream {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_present("id", &self.id)?;
        ensure_non_negative("current_revenue", self.current_revenue)?;
        ensure_non_negative("forecast_revenue", self.forecast_revenue)?;
        if let Some(growth) = self.growth {
            ensure_finite("growth", growth)?;
        }
        if let Some(margin) = self.margin {
            ensure_range("margin", margin, 0.0, 100.0)?;
        }
        if let Some(arpc) = self.avg_revenue_per_customer {
            ensure_non_negative("avg_revenue_per_customer", arpc)?;
        }
        Ok(())
    }
}

impl EntitySnapshot for RevenueStream {
    type Field = RevenueField;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn metric(&self, field: RevenueField) -> Option<f64> {
        match field {
            RevenueField::CurrentRevenue => Some(self.current_revenue),
            RevenueField::ForecastRevenue => Some(self.forecast_revenue),
            RevenueField::Growth => self.growth,
            RevenueField::Margin => self.margin,
            RevenueField::Customers => Some(self.customers as f64),
            RevenueField::AvgRevenuePerCustomer => self.avg_revenue_per_customer,
        }
    }

    fn set_metric(&mut self, field: RevenueField, value: f64) {
        match field {
            RevenueField::CurrentRevenue => self.current_revenue = value,
            RevenueField::ForecastRevenue => self.forecast_revenue = value,
            RevenueField::Growth => self.growth = Some(value),
            RevenueField::Margin => self.margin = Some(value),
            RevenueField::Customers => self.customers = value.max(0.0).round() as u64,
            RevenueField::AvgRevenuePerCustomer => self.avg_revenue_per_customer = Some(value),
        }
    }

    fn category(&self) -> Option<&str> {
        Some(self.stream_type.key())
    }
}
