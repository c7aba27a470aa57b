use super::cohort::CohortBaseline;
use super::domain::{Diagnostic, DiagnosticKind, EntitySnapshot, MetricField, Severity};
use std::fmt;
use tracing::trace;

/// Which side of the reference value triggers a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// `value < threshold`
    Below,
    /// `value > threshold`. Banded severity treats the field as lower-is-better.
    Above,
    /// `value >= threshold`, used by strength rules.
    AtLeast,
}

/// What a rule compares the subject against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reference<F> {
    /// Peer mean of the rule's own field times `factor`. Skipped when undefined.
    Cohort { factor: f64 },
    /// Fixed business threshold, independent of peers.
    Fixed(f64),
    /// Another field of the same subject times `multiple`.
    Field { field: F, multiple: f64 },
}

/// Severity applies when the performance ratio is strictly below `below_ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityBand {
    pub below_ratio: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeverityPolicy {
    Fixed(Severity),
    /// `bands` must be sorted by ascending `below_ratio`; the first match wins.
    Banded {
        bands: &'static [SeverityBand],
        otherwise: Severity,
    },
}

/// Values a triggered rule saw, handed to its description formatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub value: f64,
    /// Reference before the factor or multiple is applied (e.g. the raw peer mean).
    pub reference: f64,
    /// Value the subject was compared against.
    pub threshold: f64,
}

impl Observation {
    /// Ratio oriented so that values under 1.0 always mean "worse than reference".
    fn performance_ratio(&self, condition: Condition) -> Option<f64> {
        let ratio = match condition {
            Condition::Below | Condition::AtLeast => self.value / self.reference,
            Condition::Above => self.reference / self.value,
        };
        (self.reference > 0.0 && ratio.is_finite()).then_some(ratio)
    }
}

#[derive(Clone, Copy)]
pub struct DiagnosticRule<F: 'static> {
    pub id: &'static str,
    pub kind: DiagnosticKind,
    pub field: F,
    pub condition: Condition,
    pub reference: Reference<F>,
    pub severity: SeverityPolicy,
    pub title: &'static str,
    pub impact_area: &'static str,
    pub describe: fn(&Observation) -> String,
}

impl<F: fmt::Debug> fmt::Debug for DiagnosticRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticRule")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("field", &self.field)
            .field("condition", &self.condition)
            .field("reference", &self.reference)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackDiagnostic {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub impact_area: &'static str,
}

impl FallbackDiagnostic {
    fn to_diagnostic(self) -> Diagnostic {
        Diagnostic {
            id: self.id,
            kind: DiagnosticKind::Clear,
            title: self.title,
            description: self.description.to_string(),
            severity: Severity::Low,
            related_field: None,
            impact_area: self.impact_area,
        }
    }
}

/// Ordered rules plus the single diagnostic emitted when none of them fire.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet<F: 'static> {
    pub rules: &'static [DiagnosticRule<F>],
    pub fallback: FallbackDiagnostic,
}

impl<F: MetricField> DiagnosticRule<F> {
    fn evaluate<S>(&self, subject: &S, baseline: &CohortBaseline<F>) -> Option<Diagnostic>
    where
        S: EntitySnapshot<Field = F>,
    {
        let value = subject.metric(self.field)?;

        let (reference, threshold) = match self.reference {
            Reference::Cohort { factor } => {
                let mean = baseline.mean(self.field)?;
                (mean, mean * factor)
            }
            Reference::Fixed(limit) => (limit, limit),
            Reference::Field { field, multiple } => {
                let other = subject.metric(field)?;
                (other, other * multiple)
            }
        };

        let triggered = match self.condition {
            Condition::Below => value < threshold,
            Condition::Above => value > threshold,
            Condition::AtLeast => value >= threshold,
        };

        trace!(
            rule = self.id,
            field = self.field.key(),
            value,
            threshold,
            triggered,
            "evaluated diagnostic rule"
        );

        if !triggered {
            return None;
        }

        let observation = Observation {
            value,
            reference,
            threshold,
        };

        Some(Diagnostic {
            id: self.id,
            kind: self.kind,
            title: self.title,
            description: (self.describe)(&observation),
            severity: self.severity_for(&observation),
            related_field: Some(self.field.key()),
            impact_area: self.impact_area,
        })
    }

    fn severity_for(&self, observation: &Observation) -> Severity {
        match self.severity {
            SeverityPolicy::Fixed(severity) => severity,
            SeverityPolicy::Banded { bands, otherwise } => observation
                .performance_ratio(self.condition)
                .and_then(|ratio| {
                    bands
                        .iter()
                        .find(|band| ratio < band.below_ratio)
                        .map(|band| band.severity)
                })
                .unwrap_or(otherwise),
        }
    }
}

/// Runs every rule in order against `subject`.
///
/// Rules whose baseline or subject value is undefined are skipped, neither
/// passing nor failing. When no rule fires the result holds exactly the
/// rule set's fallback diagnostic.
pub fn detect<S: EntitySnapshot>(
    subject: &S,
    baseline: &CohortBaseline<S::Field>,
    rule_set: &RuleSet<S::Field>,
) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = rule_set
        .rules
        .iter()
        .filter_map(|rule| rule.evaluate(subject, baseline))
        .collect();

    if diagnostics.is_empty() {
        diagnostics.push(rule_set.fallback.to_diagnostic());
    }

    diagnostics
}

/// Stable sort, most severe first. Only call sites that need it apply it.
pub fn sort_by_severity(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|diagnostic| diagnostic.severity.rank());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cohort::tests::{TestEntity, TestField};

    fn below_average(observation: &Observation) -> String {
        format!("{:.1} vs {:.1}", observation.value, observation.reference)
    }

    const RULES: RuleSet<TestField> = RuleSet {
        rules: &[
            DiagnosticRule {
                id: "low-growth",
                kind: DiagnosticKind::Bottleneck,
                field: TestField::Growth,
                condition: Condition::Below,
                reference: Reference::Cohort { factor: 0.5 },
                severity: SeverityPolicy::Banded {
                    bands: &[SeverityBand {
                        below_ratio: 0.25,
                        severity: Severity::Critical,
                    }],
                    otherwise: Severity::High,
                },
                title: "Below-Average Growth Rate",
                impact_area: "Revenue Growth",
                describe: below_average,
            },
            DiagnosticRule {
                id: "thin-margin",
                kind: DiagnosticKind::Risk,
                field: TestField::Margin,
                condition: Condition::Below,
                reference: Reference::Fixed(10.0),
                severity: SeverityPolicy::Fixed(Severity::Medium),
                title: "Thin Margin",
                impact_area: "Profitability",
                describe: below_average,
            },
        ],
        fallback: FallbackDiagnostic {
            id: "no-issues",
            title: "No Material Issues",
            description: "Nothing to flag.",
            impact_area: "Overall",
        },
    };

    fn baseline_for(peers: &[TestEntity]) -> CohortBaseline<TestField> {
        let refs: Vec<&TestEntity> = peers.iter().collect();
        CohortBaseline::compute(&refs, &[TestField::Growth, TestField::Margin])
    }

    #[test]
    fn cohort_rule_is_skipped_without_baseline() {
        let subject = TestEntity::new("s", 1.0, 50.0);
        let diagnostics = detect(&subject, &CohortBaseline::empty(), &RULES);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_clear());
    }

    #[test]
    fn absolute_rule_fires_without_baseline() {
        let subject = TestEntity::new("s", 1.0, 5.0);
        let diagnostics = detect(&subject, &CohortBaseline::empty(), &RULES);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, "thin-margin");
        assert_eq!(diagnostics[0].related_field, Some("margin"));
    }

    #[test]
    fn severity_is_banded_on_relative_shortfall() {
        let baseline = baseline_for(&[TestEntity::new("p", 20.0, 50.0)]);

        let moderate = detect(&TestEntity::new("s", 8.0, 50.0), &baseline, &RULES);
        assert_eq!(moderate[0].severity, Severity::High);

        let severe = detect(&TestEntity::new("s", 4.0, 50.0), &baseline, &RULES);
        assert_eq!(severe[0].severity, Severity::Critical);
        assert_eq!(severe[0].description, "4.0 vs 20.0");
    }

    #[test]
    fn missing_subject_value_skips_rule() {
        let baseline = baseline_for(&[TestEntity::new("p", 20.0, 50.0)]);
        let mut subject = TestEntity::new("s", 0.0, 50.0);
        subject.growth = None;

        let diagnostics = detect(&subject, &baseline, &RULES);
        assert!(diagnostics[0].is_clear());
    }

    #[test]
    fn diagnostics_keep_generation_order_until_sorted() {
        let baseline = baseline_for(&[TestEntity::new("p", 20.0, 50.0)]);
        let subject = TestEntity::new("s", 8.0, 5.0);

        let mut diagnostics = detect(&subject, &baseline, &RULES);
        let ids: Vec<_> = diagnostics.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["low-growth", "thin-margin"]);

        diagnostics[1].severity = Severity::Critical;
        sort_by_severity(&mut diagnostics);
        assert_eq!(diagnostics[0].id, "thin-margin");
    }
}
