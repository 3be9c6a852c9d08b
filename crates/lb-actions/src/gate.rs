//! The approval gate.
//!
//! Per-suggestion state machine: `pending → approved | edited | rejected`,
//! all terminal. High-confidence suggestions are auto-eligible and may be
//! approved with one batch-confirm action; medium-confidence suggestions
//! require an individual decision. Nothing here executes — decisions are
//! recorded on the batch and the executor runs later.

use serde_json::Value;

use lb_core::entities::SuggestionBatch;
use lb_core::enums::Decision;

use crate::error::ActionError;

/// Record one decision on one suggestion.
///
/// `Edited` replaces the suggestion's to-value with `new_value` before the
/// transition; the executor then treats it exactly like `Approved`.
///
/// # Errors
///
/// Returns [`ActionError::InvalidDecision`] when the suggestion already has a
/// terminal decision, [`ActionError::MissingEditValue`] for an edit without a
/// value, or [`ActionError::NotFound`] for an unknown ID.
pub fn decide(
    batch: &mut SuggestionBatch,
    suggestion_id: &str,
    decision: Decision,
    new_value: Option<Value>,
) -> Result<(), ActionError> {
    if batch.superseded {
        return Err(ActionError::BatchSuperseded(batch.id.clone()));
    }
    let suggestion = batch
        .suggestion_mut(suggestion_id)
        .ok_or_else(|| ActionError::NotFound(suggestion_id.to_string()))?;

    if !suggestion.decision.can_transition_to(decision) {
        return Err(ActionError::InvalidDecision {
            from: suggestion.decision,
            to: decision,
        });
    }

    if decision == Decision::Edited {
        let value = new_value.ok_or(ActionError::MissingEditValue)?;
        suggestion.to_value = value;
    }
    suggestion.decision = decision;
    Ok(())
}

/// Approve every auto-eligible (pending, high-confidence) suggestion in one
/// action. Returns how many were approved.
pub fn approve_all_auto(batch: &mut SuggestionBatch) -> Result<usize, ActionError> {
    if batch.superseded {
        return Err(ActionError::BatchSuperseded(batch.id.clone()));
    }
    let mut approved = 0;
    for suggestion in &mut batch.suggestions {
        if suggestion.auto_eligible() {
            suggestion.decision = Decision::Approved;
            approved += 1;
        }
    }
    Ok(approved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use lb_core::entities::Suggestion;
    use lb_core::enums::{CheckKind, Confidence, TaskField};
    use lb_core::window::{Period, TimeWindow};
    use serde_json::json;

    fn batch() -> SuggestionBatch {
        SuggestionBatch::new(
            Period::Last24h,
            TimeWindow::ending_at(Utc::now(), Duration::hours(24)),
            vec![
                Suggestion::new(
                    "vendor-contract",
                    CheckKind::BlockerResolved,
                    TaskField::Status,
                    json!("blocked"),
                    json!("started"),
                    Confidence::High,
                    "sig-high",
                    "blocker resolved",
                ),
                Suggestion::new(
                    "billing",
                    CheckKind::ImplicitDateChange,
                    TaskField::NextActionDue,
                    json!("2026-01-20"),
                    json!("2026-02-03"),
                    Confidence::Medium,
                    "sig-medium",
                    "date slipped",
                ),
            ],
            vec![],
        )
    }

    #[test]
    fn decisions_are_terminal() {
        let mut b = batch();
        let id = b.suggestions[0].id.clone();
        decide(&mut b, &id, Decision::Approved, None).unwrap();
        let err = decide(&mut b, &id, Decision::Rejected, None).unwrap_err();
        assert!(matches!(err, ActionError::InvalidDecision { .. }));
    }

    #[test]
    fn edit_replaces_to_value() {
        let mut b = batch();
        let id = b.suggestions[1].id.clone();
        decide(&mut b, &id, Decision::Edited, Some(json!("2026-02-10"))).unwrap();
        assert_eq!(b.suggestions[1].decision, Decision::Edited);
        assert_eq!(b.suggestions[1].to_value, json!("2026-02-10"));
        assert!(b.suggestions[1].decision.is_executable());
    }

    #[test]
    fn edit_without_value_is_rejected() {
        let mut b = batch();
        let id = b.suggestions[1].id.clone();
        let err = decide(&mut b, &id, Decision::Edited, None).unwrap_err();
        assert!(matches!(err, ActionError::MissingEditValue));
        assert_eq!(b.suggestions[1].decision, Decision::Pending);
    }

    #[test]
    fn batch_confirm_takes_only_auto_eligible() {
        let mut b = batch();
        let approved = approve_all_auto(&mut b).unwrap();
        assert_eq!(approved, 1);
        assert_eq!(b.suggestions[0].decision, Decision::Approved);
        // Medium confidence still needs an individual decision.
        assert_eq!(b.suggestions[1].decision, Decision::Pending);
    }

    #[test]
    fn superseded_batch_refuses_decisions() {
        let mut b = batch();
        b.superseded = true;
        let id = b.suggestions[0].id.clone();
        assert!(matches!(
            decide(&mut b, &id, Decision::Approved, None),
            Err(ActionError::BatchSuperseded(_))
        ));
        assert!(matches!(
            approve_all_auto(&mut b),
            Err(ActionError::BatchSuperseded(_))
        ));
    }

    #[test]
    fn unknown_suggestion_is_not_found() {
        let mut b = batch();
        assert!(matches!(
            decide(&mut b, "sug-missing", Decision::Approved, None),
            Err(ActionError::NotFound(_))
        ));
    }
}
