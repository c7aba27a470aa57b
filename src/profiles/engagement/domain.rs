use crate::engine::{ratio, EntitySnapshot, MetricField};
use crate::input::{ensure_present, ensure_range, ValidationError};
use serde::{Deserialize, Serialize};

/// Upper bound accepted for any engagement counter.
pub const MAX_ENGAGEMENT_COUNT: u32 = 1_000;
/// Upper bound accepted for the average response time (7 days).
pub const MAX_RESPONSE_TIME_MINUTES: f64 = 10_080.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementField {
    TimesContacted,
    TimesResponded,
    TimesFollowedUp,
    /// Derived: responses per contact, as a percentage.
    ResponseRate,
    /// Derived: follow-ups per contact, as a percentage.
    FollowUpRate,
    AvgResponseTimeMinutes,
}

impl MetricField for EngagementField {
    fn key(self) -> &'static str {
        match self {
            Self::TimesContacted => "times_contacted",
            Self::TimesResponded => "times_responded",
            Self::TimesFollowedUp => "times_followed_up",
            Self::ResponseRate => "response_rate",
            Self::FollowUpRate => "follow_up_rate",
            Self::AvgResponseTimeMinutes => "avg_response_time_minutes",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::TimesContacted => "Times Contacted",
            Self::TimesResponded => "Times Responded",
            Self::TimesFollowedUp => "Times Followed Up",
            Self::ResponseRate => "Response Rate (%)",
            Self::FollowUpRate => "Follow-up Rate (%)",
            Self::AvgResponseTimeMinutes => "Avg Response Time (min)",
        }
    }
}

/// Engagement counters for one contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactEngagement {
    pub contact_id: String,
    #[serde(default)]
    pub name: String,
    pub times_contacted: u32,
    pub times_responded: u32,
    pub times_followed_up: u32,
    pub avg_response_time_minutes: f64,
}

impl ContactEngagement {
    /// Responses per contact as a 0-1 ratio; `None` when never contacted.
    pub fn response_ratio(&self) -> Option<f64> {
        ratio(self.times_responded as f64, self.times_contacted as f64)
    }

    /// Follow-ups per contact as a 0-1 ratio; `None` when never contacted.
    pub fn follow_up_ratio(&self) -> Option<f64> {
        ratio(self.times_followed_up as f64, self.times_contacted as f64)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let max = MAX_ENGAGEMENT_COUNT as f64;
        ensure_present("contact_id", &self.contact_id)?;
        ensure_range("times_contacted", self.times_contacted as f64, 0.0, max)?;
        ensure_range("times_responded", self.times_responded as f64, 0.0, max)?;
        ensure_range("times_followed_up", self.times_followed_up as f64, 0.0, max)?;
        ensure_range(
            "avg_response_time_minutes",
            self.avg_response_time_minutes,
            0.0,
            MAX_RESPONSE_TIME_MINUTES,
        )?;
        Ok(())
    }
}

fn count_from(value: f64) -> u32 {
    value.max(0.0).round().min(u32::MAX as f64) as u32
}

impl EntitySnapshot for ContactEngagement {
    type Field = EngagementField;

    fn entity_id(&self) -> &str {
        &self.contact_id
    }

    fn metric(&self, field: EngagementField) -> Option<f64> {
        match field {
            EngagementField::TimesContacted => Some(self.times_contacted as f64),
            EngagementField::TimesResponded => Some(self.times_responded as f64),
            EngagementField::TimesFollowedUp => Some(self.times_followed_up as f64),
            EngagementField::ResponseRate => self.response_ratio().map(|r| r * 100.0),
            EngagementField::FollowUpRate => self.follow_up_ratio().map(|r| r * 100.0),
            EngagementField::AvgResponseTimeMinutes => Some(self.avg_response_time_minutes),
        }
    }

    /// Derived rates are written back through their numerator counter.
    fn set_metric(&mut self, field: EngagementField, value: f64) {
        let contacted = self.times_contacted as f64;
        match field {
            EngagementField::TimesContacted => self.times_contacted = count_from(value),
            EngagementField::TimesResponded => self.times_responded = count_from(value),
            EngagementField::TimesFollowedUp => self.times_followed_up = count_from(value),
            EngagementField::ResponseRate => {
                self.times_responded = count_from(value / 100.0 * contacted)
            }
            EngagementField::FollowUpRate => {
                self.times_followed_up = count_from(value / 100.0 * contacted)
            }
            EngagementField::AvgResponseTimeMinutes => self.avg_response_time_minutes = value,
        }
    }
}
