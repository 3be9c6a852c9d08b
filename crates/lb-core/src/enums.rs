//! Status enums, source/finding/check kinds, and decision states for Logbook.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Enums with state machines provide `allowed_next_states()` to enforce valid
//! transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Confidence tier for findings and suggestions.
///
/// Fixed policy, not configurable per check: **high** means the evidentiary
/// event is an explicit, machine-structured field change from an authoritative
/// source; **medium** means inferred from unstructured text; **low** means
/// topically related only. Low-confidence items stay findings and are never
/// surfaced as suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Whether this tier is strong enough to surface as a suggestion.
    #[must_use]
    pub const fn surfaces_suggestion(self) -> bool {
        !matches!(self, Self::Low)
    }

    /// The weaker of two tiers. Suggestions inherit the strongest supporting
    /// finding's tier and are never upgraded past it.
    #[must_use]
    pub const fn min(self, other: Self) -> Self {
        match (self, other) {
            (Self::Low, _) | (_, Self::Low) => Self::Low,
            (Self::Medium, _) | (_, Self::Medium) => Self::Medium,
            (Self::High, Self::High) => Self::High,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Status of a task record. Exactly one active state at a time.
///
/// ```text
/// not_started → started → done
///                       → blocked → started (unblocked)
/// ```
///
/// Frontmatter uses single-letter codes (`n`/`s`/`b`/`d`) inherited from the
/// task file format; [`TaskStatus::code`] and [`TaskStatus::from_code`]
/// convert between the two representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    Started,
    Blocked,
    Done,
}

impl TaskStatus {
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::NotStarted => &[Self::Started],
            Self::Started => &[Self::Done, Self::Blocked],
            Self::Blocked => &[Self::Started],
            Self::Done => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Single-letter frontmatter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotStarted => "n",
            Self::Started => "s",
            Self::Blocked => "b",
            Self::Done => "d",
        }
    }

    /// Parse a frontmatter code. Accepts the legacy `ip` alias for started.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "n" => Some(Self::NotStarted),
            "s" | "ip" => Some(Self::Started),
            "b" => Some(Self::Blocked),
            "d" => Some(Self::Done),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Started => "started",
            Self::Blocked => "blocked",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority tier, four ordered levels. `P0` is most urgent and sorts first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
}

impl Priority {
    /// Parse a frontmatter value (`P0`..`P3`, case-insensitive).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "P0" => Some(Self::P0),
            "P1" => Some(Self::P1),
            "P2" => Some(Self::P2),
            "P3" => Some(Self::P3),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
            Self::P3 => "P3",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Task category. Closed enumeration; unknown frontmatter values map to
/// [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Project,
    Process,
    Research,
    Admin,
    Other,
}

impl Category {
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "project" => Self::Project,
            "process" => Self::Process,
            "research" => Self::Research,
            "admin" => Self::Admin,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Process => "process",
            Self::Research => "research",
            Self::Admin => "admin",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SourceKind
// ---------------------------------------------------------------------------

/// External system an event was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Chat,
    Tracker,
    Wiki,
    Vcs,
}

impl SourceKind {
    /// All fetchable sources, in snapshot order.
    pub const ALL: [Self; 4] = [Self::Chat, Self::Tracker, Self::Wiki, Self::Vcs];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Tracker => "tracker",
            Self::Wiki => "wiki",
            Self::Vcs => "vcs",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SourceStatus
// ---------------------------------------------------------------------------

/// Outcome of one adapter's fetch. A failure is data, not an error: the
/// snapshot stays valid regardless of how many sources failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Success,
    Partial,
    Failed,
    Disabled,
}

impl SourceStatus {
    /// Whether the sub-result carries usable events.
    #[must_use]
    pub const fn has_data(self) -> bool {
        matches!(self, Self::Success | Self::Partial)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FindingKind
// ---------------------------------------------------------------------------

/// Kind of evidence a finding carries about a task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    BlockerResolved,
    BlockerReported,
    ActionCompleted,
    DateRevised,
    DeadlineMissed,
    Inactive,
    /// Topically related but not clearly applicable. Recorded, never surfaced.
    TopicalMention,
}

impl FindingKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BlockerResolved => "blocker_resolved",
            Self::BlockerReported => "blocker_reported",
            Self::ActionCompleted => "action_completed",
            Self::DateRevised => "date_revised",
            Self::DeadlineMissed => "deadline_missed",
            Self::Inactive => "inactive",
            Self::TopicalMention => "topical_mention",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CheckKind
// ---------------------------------------------------------------------------

/// Closed table of suggestion-engine checks. Each check is a pure function
/// over `(record, findings)`; checks are independent, not mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    BlockerResolved,
    NewBlocker,
    DeadlinePassed,
    ImplicitDateChange,
    ActionCompleted,
    StaleNoActivity,
}

impl CheckKind {
    /// All checks, in evaluation order.
    pub const ALL: [Self; 6] = [
        Self::BlockerResolved,
        Self::NewBlocker,
        Self::DeadlinePassed,
        Self::ImplicitDateChange,
        Self::ActionCompleted,
        Self::StaleNoActivity,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BlockerResolved => "blocker_resolved",
            Self::NewBlocker => "new_blocker",
            Self::DeadlinePassed => "deadline_passed",
            Self::ImplicitDateChange => "implicit_date_change",
            Self::ActionCompleted => "action_completed",
            Self::StaleNoActivity => "stale_no_activity",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskField
// ---------------------------------------------------------------------------

/// Mutable task record field a suggestion may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    Status,
    NextAction,
    NextActionDue,
    DueDate,
}

impl TaskField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::NextAction => "next_action",
            Self::NextActionDue => "next_action_due",
            Self::DueDate => "due_date",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Human decision on a suggestion at the approval gate.
///
/// ```text
/// pending → approved
///         → edited   (to-value replaced; executes like approved)
///         → rejected (terminal, evidence retained, never retried)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Pending,
    Approved,
    Edited,
    Rejected,
}

impl Decision {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Edited, Self::Rejected],
            Self::Approved | Self::Edited | Self::Rejected => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether the executor should act on a suggestion in this state.
    #[must_use]
    pub const fn is_executable(self) -> bool {
        matches!(self, Self::Approved | Self::Edited)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Edited => "edited",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ExecutionOutcome
// ---------------------------------------------------------------------------

/// Outcome of executing one approved suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// Mutation applied and logged.
    Success,
    /// External mutation failed; a manual fallback instruction was produced.
    FailedWithFallback,
    /// Local mutation failed; recorded and skipped, batch continued.
    Logged,
}

impl ExecutionOutcome {
    /// Only successful executions suppress re-offering the same suggestion.
    #[must_use]
    pub const fn suppresses_reoffer(self) -> bool {
        matches!(self, Self::Success)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::FailedWithFallback => "failed_with_fallback",
            Self::Logged => "logged",
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
