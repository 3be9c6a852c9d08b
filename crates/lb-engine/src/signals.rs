//! Text-signal detection over unstructured event text.
//!
//! Everything here is deliberately conservative: exact phrase matches with
//! word boundaries, no stemming, no fuzzy matching. Text inference caps at
//! medium confidence — only structured tracker field changes reach high.

use chrono::{Datelike, NaiveDate};

const RESOLUTION_PHRASES: [&str; 5] =
    ["resolved", "unblocked", "fixed", "closed", "no longer blocked"];

const BLOCKER_PHRASES: [&str; 3] = ["blocked by", "waiting on", "blocked on"];

const COMPLETION_PHRASES: [&str; 5] = ["done", "completed", "finished", "shipped", "merged"];

const REVISED_DATE_PHRASES: [&str; 4] = ["moved to", "pushed to", "slipped to", "now due"];

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Whether `text` states that something was resolved or unblocked.
#[must_use]
pub fn resolution_signal(text: &str) -> bool {
    let text = text.to_lowercase();
    RESOLUTION_PHRASES
        .iter()
        .any(|p| contains_phrase(&text, p))
}

/// Extract a new-blocker description: the text following the first blocker
/// phrase, up to the end of the sentence (capped at 80 chars).
#[must_use]
pub fn blocker_signal(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    for phrase in BLOCKER_PHRASES {
        if let Some(pos) = find_phrase(&lower, phrase) {
            let blocker: String = lower[pos + phrase.len()..]
                .chars()
                .take_while(|c| !matches!(c, '.' | '\n' | ';'))
                .take(80)
                .collect();
            let blocker = blocker.trim();
            if !blocker.is_empty() {
                return Some(blocker.to_string());
            }
        }
    }
    None
}

/// Whether `text` states that work was completed. Returns `Some(explicit)`
/// where `explicit` is true when the current action's own words appear in the
/// text.
#[must_use]
pub fn completion_signal(text: &str, action: &str) -> Option<bool> {
    let lower = text.to_lowercase();
    if !COMPLETION_PHRASES.iter().any(|p| contains_phrase(&lower, p)) {
        return None;
    }
    let action = action.trim().to_lowercase();
    Some(!action.is_empty() && lower.contains(&action))
}

/// Extract a revised date following a reschedule phrase.
///
/// Accepts `YYYY-MM-DD` and `Mon DD` (month name, current or next year —
/// whichever keeps the date in the future relative to `today`).
#[must_use]
pub fn revised_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = text.to_lowercase();
    for phrase in REVISED_DATE_PHRASES {
        if let Some(pos) = find_phrase(&lower, phrase) {
            let rest = lower[pos + phrase.len()..].trim_start();
            if let Some(date) = parse_leading_date(rest, today) {
                return Some(date);
            }
        }
    }
    None
}

fn parse_leading_date(rest: &str, today: NaiveDate) -> Option<NaiveDate> {
    let mut tokens = rest.split_whitespace();
    let first = tokens.next()?;

    // ISO form first.
    let iso = first.trim_matches(|c: char| !c.is_ascii_digit() && c != '-');
    if let Ok(date) = NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        return Some(date);
    }

    // Month-name form: "feb 3", "february 3rd".
    let month = MONTHS
        .iter()
        .position(|m| first.starts_with(m))
        .map(|idx| idx as u32 + 1)?;
    let day_token = tokens.next()?;
    let day: u32 = day_token
        .trim_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .ok()?;

    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year >= today {
        Some(this_year)
    } else {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    }
}

/// Phrase match with word boundaries on both sides.
fn contains_phrase(text: &str, phrase: &str) -> bool {
    find_phrase(text, phrase).is_some()
}

fn find_phrase(text: &str, phrase: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = text[from..].find(phrase) {
        let pos = from + rel;
        let before_ok = pos == 0
            || !text[..pos]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);
        let after = pos + phrase.len();
        let after_ok = after >= text.len()
            || !text[after..].chars().next().is_some_and(char::is_alphanumeric);
        if before_ok && after_ok {
            return Some(pos);
        }
        from = pos + phrase.len();
    }
    None
}
