use super::cohort::CohortBaseline;
use super::domain::{Diagnostic, Difficulty, EntitySnapshot, ImpactUnit, MetricField, Recommendation};
use std::cmp::Ordering;
use std::fmt;

/// Default cap on the number of recommendations returned per analysis.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Condition under which a template yields a recommendation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Applicability<F> {
    Always,
    /// A diagnostic with this id was emitted for the subject.
    Diagnostic(&'static str),
    /// Subject value is strictly below the peer mean. Skipped without a baseline.
    BelowCohort(F),
    /// Subject value is recorded and strictly positive.
    Positive(F),
    /// Subject value lies strictly between the bounds.
    Between { field: F, above: f64, below: f64 },
    /// Subject category matches, regardless of diagnostics.
    Category(&'static str),
}

/// Deterministic projected impact of a template, clamped at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpactFormula<F: 'static> {
    /// `subject[field] * multiplier`
    Fraction { field: F, multiplier: f64 },
    /// Product of every listed field times `multiplier`; a missing field counts as zero.
    Product {
        fields: &'static [F],
        multiplier: f64,
    },
    /// Qualitative remediation with no currency effect.
    Unquantified,
}

/// Context handed to template description formatters.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub category: Option<&'a str>,
    pub projected_impact: f64,
}

#[derive(Clone, Copy)]
pub struct RecommendationTemplate<F: 'static> {
    pub id: &'static str,
    pub title: &'static str,
    pub applicability: Applicability<F>,
    pub impact: ImpactFormula<F>,
    pub impact_unit: ImpactUnit,
    pub difficulty: Difficulty,
    pub timeframe_days: u16,
    pub action_label: &'static str,
    pub describe: fn(&TemplateContext<'_>) -> String,
}

impl<F: fmt::Debug> fmt::Debug for RecommendationTemplate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecommendationTemplate")
            .field("id", &self.id)
            .field("applicability", &self.applicability)
            .field("impact", &self.impact)
            .field("difficulty", &self.difficulty)
            .field("timeframe_days", &self.timeframe_days)
            .finish_non_exhaustive()
    }
}

impl<F: MetricField> ImpactFormula<F> {
    pub fn evaluate<S>(&self, subject: &S) -> f64
    where
        S: EntitySnapshot<Field = F>,
    {
        let raw = match *self {
            ImpactFormula::Fraction { field, multiplier } => {
                subject.metric(field).unwrap_or(0.0) * multiplier
            }
            ImpactFormula::Product { fields, multiplier } => {
                fields
                    .iter()
                    .map(|field| subject.metric(*field).unwrap_or(0.0))
                    .product::<f64>()
                    * multiplier
            }
            ImpactFormula::Unquantified => 0.0,
        };

        if raw.is_finite() {
            raw.max(0.0)
        } else {
            0.0
        }
    }
}

impl<F: MetricField> RecommendationTemplate<F> {
    fn applies<S>(
        &self,
        subject: &S,
        baseline: &CohortBaseline<F>,
        diagnostics: &[Diagnostic],
    ) -> bool
    where
        S: EntitySnapshot<Field = F>,
    {
        match self.applicability {
            Applicability::Always => true,
            Applicability::Diagnostic(id) => diagnostics.iter().any(|d| d.id == id),
            Applicability::BelowCohort(field) => {
                match (subject.metric(field), baseline.mean(field)) {
                    (Some(value), Some(mean)) => value < mean,
                    _ => false,
                }
            }
            Applicability::Positive(field) => subject.metric(field).is_some_and(|v| v > 0.0),
            Applicability::Between {
                field,
                above,
                below,
            } => subject
                .metric(field)
                .is_some_and(|v| v > above && v < below),
            Applicability::Category(category) => subject.category() == Some(category),
        }
    }

    fn instantiate<S>(&self, subject: &S, addresses: Option<&'static str>) -> Recommendation
    where
        S: EntitySnapshot<Field = F>,
    {
        let projected_impact = self.impact.evaluate(subject);
        let context = TemplateContext {
            category: subject.category(),
            projected_impact,
        };

        Recommendation {
            id: self.id,
            title: self.title,
            description: (self.describe)(&context),
            projected_impact,
            impact_unit: self.impact_unit,
            difficulty: self.difficulty,
            timeframe_days: self.timeframe_days,
            action_label: self.action_label,
            addresses,
        }
    }
}

/// Instantiates every applicable template in order, truncated to `limit`.
///
/// Truncation keeps generation order; ranking by impact is the separate
/// [`rank_by_impact`] step.
pub fn generate<S: EntitySnapshot>(
    subject: &S,
    baseline: &CohortBaseline<S::Field>,
    diagnostics: &[Diagnostic],
    templates: &[RecommendationTemplate<S::Field>],
    limit: usize,
) -> Vec<Recommendation> {
    templates
        .iter()
        .filter(|template| template.applies(subject, baseline, diagnostics))
        .map(|template| {
            let addresses = match template.applicability {
                Applicability::Diagnostic(id) => Some(id),
                _ => None,
            };
            template.instantiate(subject, addresses)
        })
        .take(limit)
        .collect()
}

/// Reorders by projected impact, largest first. Ties keep their original order.
pub fn rank_by_impact(mut recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    recommendations.sort_by(|a, b| {
        b.projected_impact
            .partial_cmp(&a.projected_impact)
            .unwrap_or(Ordering::Equal)
    });
    recommendations
}

pub fn total_projected_impact(recommendations: &[Recommendation]) -> f64 {
    recommendations.iter().map(|r| r.projected_impact).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cohort::tests::{TestEntity, TestField};
    use crate::engine::domain::{DiagnosticKind, Severity};

    fn plain(_: &TemplateContext<'_>) -> String {
        "do the thing".to_string()
    }

    fn with_category(context: &TemplateContext<'_>) -> String {
        format!("grow the {} line", context.category.unwrap_or("unknown"))
    }

    fn template(
        id: &'static str,
        applicability: Applicability<TestField>,
        impact: ImpactFormula<TestField>,
    ) -> RecommendationTemplate<TestField> {
        RecommendationTemplate {
            id,
            title: id,
            applicability,
            impact,
            impact_unit: ImpactUnit::Currency,
            difficulty: Difficulty::Easy,
            timeframe_days: 30,
            action_label: "Act",
            describe: plain,
        }
    }

    fn margin_diagnostic() -> Diagnostic {
        Diagnostic {
            id: "low-margin",
            kind: DiagnosticKind::Bottleneck,
            title: "Margin Compression",
            description: String::new(),
            severity: Severity::High,
            related_field: Some("margin"),
            impact_area: "Profitability",
        }
    }

    #[test]
    fn diagnostic_templates_follow_emitted_findings() {
        let subject = TestEntity::new("s", 10.0, 40.0);
        let templates = [template(
            "fix-margin",
            Applicability::Diagnostic("low-margin"),
            ImpactFormula::Fraction {
                field: TestField::Margin,
                multiplier: 0.1,
            },
        )];

        let none = generate(&subject, &CohortBaseline::empty(), &[], &templates, 5);
        assert!(none.is_empty());

        let some = generate(
            &subject,
            &CohortBaseline::empty(),
            &[margin_diagnostic()],
            &templates,
            5,
        );
        assert_eq!(some.len(), 1);
        assert_eq!(some[0].addresses, Some("low-margin"));
        assert!((some[0].projected_impact - 4.0).abs() < 1e-9);
    }

    #[test]
    fn negative_inputs_never_produce_negative_impact() {
        let subject = TestEntity::new("s", -12.0, 40.0);
        let templates = [template(
            "growth",
            Applicability::Always,
            ImpactFormula::Fraction {
                field: TestField::Growth,
                multiplier: 0.15,
            },
        )];

        let recs = generate(&subject, &CohortBaseline::empty(), &[], &templates, 5);
        assert_eq!(recs[0].projected_impact, 0.0);
    }

    #[test]
    fn list_is_truncated_in_generation_order() {
        let subject = TestEntity::new("s", 10.0, 40.0);
        let templates: Vec<_> = ["a", "b", "c", "d"]
            .into_iter()
            .map(|id| template(id, Applicability::Always, ImpactFormula::Unquantified))
            .collect();

        let recs = generate(&subject, &CohortBaseline::empty(), &[], &templates, 2);
        let ids: Vec<_> = recs.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn below_cohort_requires_a_baseline() {
        let subject = TestEntity::new("s", 5.0, 40.0);
        let peer = TestEntity::new("p", 20.0, 40.0);
        let baseline = CohortBaseline::compute(&[&peer], &[TestField::Growth]);
        let templates = [template(
            "expand",
            Applicability::BelowCohort(TestField::Growth),
            ImpactFormula::Unquantified,
        )];

        assert!(generate(&subject, &CohortBaseline::empty(), &[], &templates, 5).is_empty());
        assert_eq!(generate(&subject, &baseline, &[], &templates, 5).len(), 1);
    }

    #[test]
    fn category_templates_apply_unconditionally() {
        let mut subject = TestEntity::new("s", 50.0, 90.0);
        subject.category = Some("subscription");
        let mut retention = template(
            "churn",
            Applicability::Category("subscription"),
            ImpactFormula::Product {
                fields: &[TestField::Growth, TestField::Margin],
                multiplier: 0.5,
            },
        );
        retention.describe = with_category;

        let recs = generate(&subject, &CohortBaseline::empty(), &[], &[retention], 5);
        assert_eq!(recs[0].projected_impact, 2_250.0);
        assert_eq!(recs[0].description, "grow the subscription line");
    }

    #[test]
    fn ranking_is_a_separate_stable_step() {
        let subject = TestEntity::new("s", 100.0, 10.0);
        let templates = [
            template(
                "small",
                Applicability::Always,
                ImpactFormula::Fraction {
                    field: TestField::Margin,
                    multiplier: 1.0,
                },
            ),
            template(
                "large",
                Applicability::Always,
                ImpactFormula::Fraction {
                    field: TestField::Growth,
                    multiplier: 1.0,
                },
            ),
        ];

        let generated = generate(&subject, &CohortBaseline::empty(), &[], &templates, 5);
        assert_eq!(generated[0].id, "small");
        assert_eq!(total_projected_impact(&generated), 110.0);

        let ranked = rank_by_impact(generated);
        assert_eq!(ranked[0].id, "large");
    }
}
