//! Plain-text rendering of batches, shared by `run`, `review`, and `apply`.

use lb_core::entities::{Alert, Suggestion, SuggestionBatch};
use lb_core::enums::Decision;

pub fn print_batch(batch: &SuggestionBatch) {
    print_suggestions(&batch.suggestions, &batch.id);
    print_alerts(&batch.alerts);
}

pub fn print_suggestions(suggestions: &[Suggestion], batch_id: &str) {
    if suggestions.is_empty() {
        println!("no suggestions (batch {batch_id})");
        return;
    }

    println!("suggestions ({}) in batch {batch_id}:", suggestions.len());
    for (position, suggestion) in suggestions.iter().enumerate() {
        let confirm = if suggestion.requires_confirmation {
            ", needs confirmation"
        } else {
            ""
        };
        println!(
            "{:>2}. [{}{confirm}] {} {}: {} -> {}",
            position + 1,
            suggestion.confidence,
            suggestion.record_id,
            suggestion.field,
            suggestion.from_value,
            suggestion.to_value,
        );
        println!("      {}", suggestion.rationale);
        if suggestion.decision != Decision::Pending {
            match suggestion.outcome {
                Some(outcome) => println!("      {} / {outcome}", suggestion.decision),
                None => println!("      {}", suggestion.decision),
            }
        }
        if let Some(fallback) = &suggestion.fallback {
            println!("      manual step: {fallback}");
        }
    }
}

pub fn print_alerts(alerts: &[Alert]) {
    if alerts.is_empty() {
        return;
    }
    println!("alerts ({}):", alerts.len());
    for alert in alerts {
        println!("  - [{}] {}: {}", alert.kind, alert.record_id, alert.message);
    }
}
