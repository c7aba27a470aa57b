use super::domain::{EntitySnapshot, MetricField};
use serde::Serialize;
use std::collections::BTreeMap;

/// Whether the subject is counted in its own peer average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CohortMembership {
    IncludeSubject,
    ExcludeSubject,
}

/// Mean of `field` across `peers`, or `None` for an empty peer set.
///
/// Peers missing the field count as zero so the cohort size never shrinks.
pub fn baseline<S: EntitySnapshot>(peers: &[&S], field: S::Field) -> Option<f64> {
    if peers.is_empty() {
        return None;
    }

    let total: f64 = peers
        .iter()
        .map(|peer| peer.metric(field).unwrap_or(0.0))
        .sum();
    Some(total / peers.len() as f64)
}

/// Selects the comparison set for `subject_id` out of `all` according to `membership`.
pub fn cohort_for<'a, S: EntitySnapshot>(
    subject_id: &str,
    all: &'a [S],
    membership: CohortMembership,
) -> Vec<&'a S> {
    all.iter()
        .filter(|entity| match membership {
            CohortMembership::IncludeSubject => true,
            CohortMembership::ExcludeSubject => entity.entity_id() != subject_id,
        })
        .collect()
}

/// Per-field peer means computed in one pass for a single analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortBaseline<F: MetricField> {
    peer_count: usize,
    means: BTreeMap<F, f64>,
}

impl<F: MetricField> CohortBaseline<F> {
    pub fn compute<S>(peers: &[&S], fields: &[F]) -> Self
    where
        S: EntitySnapshot<Field = F>,
    {
        let means = fields
            .iter()
            .filter_map(|field| baseline(peers, *field).map(|mean| (*field, mean)))
            .collect();

        Self {
            peer_count: peers.len(),
            means,
        }
    }

    /// A baseline with no peers; every lookup is undefined.
    pub fn empty() -> Self {
        Self {
            peer_count: 0,
            means: BTreeMap::new(),
        }
    }

    pub fn peer_count(&self) -> usize {
        self.peer_count
    }

    pub fn is_empty(&self) -> bool {
        self.peer_count == 0
    }

    pub fn mean(&self, field: F) -> Option<f64> {
        self.means.get(&field).copied()
    }

    /// Serializable view keyed by field key.
    pub fn to_view(&self) -> BaselineView {
        BaselineView {
            peer_count: self.peer_count,
            means: self
                .means
                .iter()
                .map(|(field, mean)| (field.key(), *mean))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineView {
    pub peer_count: usize,
    pub means: BTreeMap<&'static str, f64>,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub(crate) enum TestField {
        Growth,
        Margin,
    }

    impl MetricField for TestField {
        fn key(self) -> &'static str {
            match self {
                Self::Growth => "growth",
                Self::Margin => "margin",
            }
        }

        fn label(self) -> &'static str {
            match self {
                Self::Growth => "Growth",
                Self::Margin => "Margin",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct TestEntity {
        pub id: &'static str,
        pub growth: Option<f64>,
        pub margin: Option<f64>,
        pub category: Option<&'static str>,
    }

    impl TestEntity {
        pub(crate) fn new(id: &'static str, growth: f64, margin: f64) -> Self {
            Self {
                id,
                growth: Some(growth),
                margin: Some(margin),
                category: None,
            }
        }
    }

    impl EntitySnapshot for TestEntity {
        type Field = TestField;

        fn entity_id(&self) -> &str {
            self.id
        }

        fn metric(&self, field: TestField) -> Option<f64> {
            match field {
                TestField::Growth => self.growth,
                TestField::Margin => self.margin,
            }
        }

        fn set_metric(&mut self, field: TestField, value: f64) {
            match field {
                TestField::Growth => self.growth = Some(value),
                TestField::Margin => self.margin = Some(value),
            }
        }

        fn category(&self) -> Option<&str> {
            self.category
        }
    }

    #[test]
    fn empty_cohort_has_no_baseline() {
        let peers: Vec<&TestEntity> = Vec::new();
        assert_eq!(baseline(&peers, TestField::Growth), None);

        let computed = CohortBaseline::compute(&peers, &[TestField::Growth]);
        assert!(computed.is_empty());
        assert_eq!(computed.mean(TestField::Growth), None);
    }

    #[test]
    fn missing_fields_count_as_zero() {
        let a = TestEntity::new("a", 10.0, 40.0);
        let mut b = TestEntity::new("b", 20.0, 40.0);
        b.growth = None;

        let peers = vec![&a, &b];
        assert_eq!(baseline(&peers, TestField::Growth), Some(5.0));
        assert_eq!(baseline(&peers, TestField::Margin), Some(40.0));
    }

    #[test]
    fn membership_controls_self_inclusion() {
        let all = vec![
            TestEntity::new("a", 10.0, 10.0),
            TestEntity::new("b", 30.0, 10.0),
        ];

        let included = cohort_for("a", &all, CohortMembership::IncludeSubject);
        let excluded = cohort_for("a", &all, CohortMembership::ExcludeSubject);

        assert_eq!(baseline(&included, TestField::Growth), Some(20.0));
        assert_eq!(baseline(&excluded, TestField::Growth), Some(30.0));
    }

    #[test]
    fn baseline_view_uses_field_keys() {
        let a = TestEntity::new("a", 4.0, 50.0);
        let computed = CohortBaseline::compute(&[&a], &[TestField::Growth, TestField::Margin]);
        let view = computed.to_view();
        assert_eq!(view.peer_count, 1);
        assert_eq!(view.means.get("growth"), Some(&4.0));
        assert_eq!(view.means.get("margin"), Some(&50.0));
    }
}
