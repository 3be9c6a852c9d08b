//! Task file format: frontmatter between `---` fences plus a markdown body.
//!
//! The frontmatter is deliberately not full YAML — single-line `key: value`
//! pairs, optional quotes, empty or `null` values treated as absent. The body
//! may carry a `## Progress` section (`- YYYY-MM-DD: text` bullets, ordered,
//! append-only) and a `## Next Steps` section (`- [ ] text (due YYYY-MM-DD)`
//! bullets; checked items are no longer pending).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use lb_core::entities::{BlockInfo, NextStep, ProgressEntry};

/// Parsed halves of a task file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDocument {
    pub fields: BTreeMap<String, String>,
    pub body: String,
}

/// Split a task file into frontmatter fields and body.
///
/// Returns `None` when the file has no frontmatter fences at all; such files
/// are not task records.
#[must_use]
pub fn parse_document(content: &str) -> Option<TaskDocument> {
    let rest = content.strip_prefix("---")?;
    let (front, body) = rest.split_once("---")?;

    let mut fields = BTreeMap::new();
    for line in front.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_string();
        let mut value = value.trim();
        if (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
            || (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
        {
            value = &value[1..value.len() - 1];
        }
        if value.is_empty() || value == "null" {
            continue;
        }
        fields.insert(key, value.to_string());
    }

    Some(TaskDocument {
        fields,
        body: body.trim_start_matches('\n').to_string(),
    })
}

/// Serialize frontmatter fields and body back into file content.
///
/// Fields are written in a fixed order so rewrites produce stable diffs;
/// unknown keys are appended alphabetically after the known ones.
#[must_use]
pub fn render_document(doc: &TaskDocument) -> String {
    const ORDER: [&str; 12] = [
        "title",
        "category",
        "priority",
        "status",
        "due_date",
        "next_action",
        "next_action_due",
        "blocked_type",
        "blocked_by",
        "blocked_expected",
        "refs",
        "completed",
    ];

    let mut out = String::from("---\n");
    for key in ORDER {
        if let Some(value) = doc.fields.get(key) {
            out.push_str(&format!("{key}: {value}\n"));
        }
    }
    for (key, value) in &doc.fields {
        if !ORDER.contains(&key.as_str()) {
            out.push_str(&format!("{key}: {value}\n"));
        }
    }
    out.push_str("---\n");
    if !doc.body.is_empty() {
        out.push('\n');
        out.push_str(&doc.body);
        if !doc.body.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Extract blocking metadata from frontmatter fields, if any.
#[must_use]
pub fn block_info(fields: &BTreeMap<String, String>) -> Option<BlockInfo> {
    let blocked_by = fields.get("blocked_by")?.clone();
    Some(BlockInfo {
        block_type: fields.get("blocked_type").cloned(),
        blocked_by,
        expected: fields.get("blocked_expected").and_then(|s| parse_date(s)),
    })
}

/// Parse a `YYYY-MM-DD` date, tolerating surrounding whitespace.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse the `## Progress` section of a body.
#[must_use]
pub fn parse_progress(body: &str) -> Vec<ProgressEntry> {
    section_lines(body, "## Progress")
        .filter_map(|line| {
            let item = line.strip_prefix("- ")?;
            let (date, text) = item.split_once(':')?;
            Some(ProgressEntry {
                date: parse_date(date)?,
                text: text.trim().to_string(),
            })
        })
        .collect()
}

/// Parse unchecked items from the `## Next Steps` section of a body.
#[must_use]
pub fn parse_pending_steps(body: &str) -> Vec<NextStep> {
    section_lines(body, "## Next Steps")
        .filter_map(|line| {
            let item = line.strip_prefix("- [ ]")?.trim();
            Some(parse_step(item))
        })
        .collect()
}

/// Split `text (due YYYY-MM-DD)` into a step with an optional due date.
fn parse_step(item: &str) -> NextStep {
    if let Some(open) = item.rfind("(due ") {
        if let Some(close) = item[open..].find(')') {
            let date_str = &item[open + "(due ".len()..open + close];
            if let Some(due) = parse_date(date_str) {
                return NextStep {
                    text: item[..open].trim().to_string(),
                    due: Some(due),
                };
            }
        }
    }
    NextStep {
        text: item.to_string(),
        due: None,
    }
}

/// Append one progress bullet to the body, creating the section if missing.
#[must_use]
pub fn append_progress(body: &str, entry: &ProgressEntry) -> String {
    let bullet = format!("- {}: {}", entry.date.format("%Y-%m-%d"), entry.text);
    let mut body = body.to_string();
    if body.contains("## Progress") {
        // Insert after the last line of the section.
        let mut lines: Vec<&str> = body.lines().collect();
        let header = lines
            .iter()
            .position(|l| l.trim() == "## Progress")
            .unwrap_or(lines.len().saturating_sub(1));
        let mut insert_at = header + 1;
        while insert_at < lines.len()
            && (lines[insert_at].starts_with("- ") || lines[insert_at].trim().is_empty())
        {
            if lines[insert_at].trim().is_empty()
                && lines
                    .get(insert_at + 1)
                    .is_none_or(|next| !next.starts_with("- "))
            {
                break;
            }
            insert_at += 1;
        }
        lines.insert(insert_at, &bullet);
        lines.join("\n")
    } else {
        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str("## Progress\n");
        body.push_str(&bullet);
        body
    }
}

/// Iterate the lines belonging to one `##` section.
fn section_lines<'a>(body: &'a str, header: &'a str) -> impl Iterator<Item = &'a str> {
    body.lines()
        .skip_while(move |line| line.trim() != header)
        .skip(1)
        .take_while(|line| !line.starts_with("## "))
        .map(str::trim_end)
}
