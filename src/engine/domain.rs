use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// A typed metric on an entity. Each entity kind supplies its own field enum so
/// rule tables cannot reference a field the snapshot does not carry.
pub trait MetricField: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {
    /// Stable machine key, used in serialized diagnostics and audit trails.
    fn key(self) -> &'static str;
    fn label(self) -> &'static str;
}

/// Point-in-time numeric view of one subject.
///
/// The engine only reads snapshots. `set_metric` is called exclusively on a
/// clone owned by the simulation applier.
pub trait EntitySnapshot: Clone {
    type Field: MetricField;

    fn entity_id(&self) -> &str;

    /// `None` when the subject has no value recorded for `field`.
    fn metric(&self, field: Self::Field) -> Option<f64>;

    fn set_metric(&mut self, field: Self::Field, value: f64);

    /// Optional grouping used by category-wide recommendation templates.
    fn category(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Lower rank sorts first.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Bottleneck,
    Risk,
    Strength,
    /// Explicit "nothing material found" marker emitted instead of an empty list.
    Clear,
}

impl DiagnosticKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bottleneck => "Bottleneck",
            Self::Risk => "Risk",
            Self::Strength => "Strength",
            Self::Clear => "Clear",
        }
    }
}

/// A finding about one subject relative to its cohort or a fixed threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub id: &'static str,
    pub kind: DiagnosticKind,
    pub title: &'static str,
    pub description: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_field: Option<&'static str>,
    pub impact_area: &'static str,
}

impl Diagnostic {
    pub fn is_clear(&self) -> bool {
        self.kind == DiagnosticKind::Clear
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactUnit {
    Currency,
    /// Qualitative remediation; the projected impact is always zero.
    Points,
}

/// A suggested action with a deterministic, non-negative projected impact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: &'static str,
    pub title: &'static str,
    pub description: String,
    pub projected_impact: f64,
    pub impact_unit: ImpactUnit,
    pub difficulty: Difficulty,
    pub timeframe_days: u16,
    pub action_label: &'static str,
    /// Diagnostic id this recommendation responds to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<&'static str>,
}

impl Recommendation {
    pub fn timeframe_label(&self) -> String {
        format!("{} days", self.timeframe_days)
    }
}
