//! Noise filter applied by every adapter before returning events.
//!
//! Drops automation chatter: bot authors and events with no usable text.
//! Applied inside the adapters so the aggregator only ever sees events worth
//! linking.

use lb_core::entities::SourceEvent;

/// Author substrings that mark an event as automated.
const BOT_MARKERS: [&str; 4] = ["[bot]", "-bot", "bot-", "automation"];

/// Whether an event should be dropped as noise.
#[must_use]
pub fn is_noise(event: &SourceEvent) -> bool {
    if event.title.trim().is_empty() && event.body.trim().is_empty() {
        return true;
    }
    if let Some(author) = &event.author {
        let author = author.to_lowercase();
        if BOT_MARKERS.iter().any(|marker| author.contains(marker)) {
            return true;
        }
    }
    false
}

/// Filter a batch of events in place, preserving order.
#[must_use]
pub fn drop_noise(events: Vec<SourceEvent>) -> Vec<SourceEvent> {
    events.into_iter().filter(|e| !is_noise(e)).collect()
}
