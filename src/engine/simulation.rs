use super::domain::{EntitySnapshot, MetricField, Recommendation};
use serde::Serialize;

/// One explicit field-update rule applied when previewing a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldUpdate<F: 'static> {
    /// `field += total_impact * factor`
    AddTotalImpact { field: F, factor: f64 },
    /// `field += selected.len() * step`
    StepPerSelection { field: F, step: f64 },
    /// `field = min(max, field + bonus)`, only when `recommendation` is selected.
    BonusWhenSelected {
        field: F,
        recommendation: &'static str,
        bonus: f64,
        max: f64,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("select at least one recommendation")]
    NothingSelected,
    #[error("recommendation '{0}' is not available for this entity")]
    UnknownRecommendation(String),
    #[error("recommendation '{0}' was selected more than once")]
    DuplicateSelection(String),
}

/// Audit entry describing one field the simulation changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub label: &'static str,
    pub before: f64,
    pub after: f64,
}

/// Hypothetical snapshot after applying a selection. Never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult<S> {
    pub snapshot: S,
    pub total_impact: f64,
    pub applied: Vec<&'static str>,
    pub changes: Vec<FieldChange>,
}

/// Picks recommendations by id, preserving the order of `ids`. Each id may
/// appear once.
pub fn select_by_id<I, T>(
    available: &[Recommendation],
    ids: I,
) -> Result<Vec<Recommendation>, SimulationError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut selected: Vec<Recommendation> = Vec::new();
    for id in ids {
        let id = id.as_ref().trim();
        if selected.iter().any(|rec| rec.id == id) {
            return Err(SimulationError::DuplicateSelection(id.to_string()));
        }
        let rec = available
            .iter()
            .find(|rec| rec.id == id)
            .ok_or_else(|| SimulationError::UnknownRecommendation(id.to_string()))?;
        selected.push(rec.clone());
    }
    Ok(selected)
}

fn ensure_distinct(selected: &[Recommendation]) -> Result<(), SimulationError> {
    for (index, rec) in selected.iter().enumerate() {
        if selected[..index].iter().any(|earlier| earlier.id == rec.id) {
            return Err(SimulationError::DuplicateSelection(rec.id.to_string()));
        }
    }
    Ok(())
}

/// Previews `selected` against a copy of `subject`.
///
/// An empty selection is rejected with [`SimulationError::NothingSelected`]
/// rather than echoing the unchanged subject back, and a selection that
/// repeats an id is rejected with [`SimulationError::DuplicateSelection`].
pub fn apply<S: EntitySnapshot>(
    subject: &S,
    selected: &[Recommendation],
    updates: &[FieldUpdate<S::Field>],
) -> Result<SimulationResult<S>, SimulationError> {
    if selected.is_empty() {
        return Err(SimulationError::NothingSelected);
    }
    ensure_distinct(selected)?;

    let total_impact: f64 = selected.iter().map(|r| r.projected_impact).sum();
    let mut snapshot = subject.clone();
    let mut changes = Vec::new();

    for update in updates {
        let (field, after) = match *update {
            FieldUpdate::AddTotalImpact { field, factor } => {
                (field, current(&snapshot, field) + total_impact * factor)
            }
            FieldUpdate::StepPerSelection { field, step } => (
                field,
                current(&snapshot, field) + selected.len() as f64 * step,
            ),
            FieldUpdate::BonusWhenSelected {
                field,
                recommendation,
                bonus,
                max,
            } => {
                if !selected.iter().any(|r| r.id == recommendation) {
                    continue;
                }
                (field, (current(&snapshot, field) + bonus).min(max))
            }
        };

        let before = current(&snapshot, field);
        snapshot.set_metric(field, after);
        changes.push(FieldChange {
            field: field.key(),
            label: field.label(),
            before,
            after,
        });
    }

    Ok(SimulationResult {
        snapshot,
        total_impact,
        applied: selected.iter().map(|r| r.id).collect(),
        changes,
    })
}

fn current<S: EntitySnapshot>(snapshot: &S, field: S::Field) -> f64 {
    snapshot.metric(field).unwrap_or(0.0)
}
