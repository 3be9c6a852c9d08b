//! # lb-sources
//!
//! Read-only activity adapters for Logbook's external sources:
//! - chat (Slack search API)
//! - tracker (Jira issue search)
//! - wiki (Confluence space content)
//! - vcs (local git history via `gix`)
//!
//! Every adapter exposes the same contract: [`SourceAdapter::fetch`] takes a
//! time window and returns a [`SourceResult`] — never an `Err`. Transport
//! failures, non-success statuses, and malformed responses become `failed`
//! sub-results; a missing credential becomes `disabled`. The aggregator can
//! therefore fan out to all adapters and always assemble a snapshot.

pub mod chat;
pub mod filter;
pub mod tracker;
pub mod vcs;
pub mod wiki;

mod error;
mod http;

pub use chat::ChatAdapter;
pub use error::SourceError;
pub use http::client as http_client;
pub use tracker::TrackerAdapter;
pub use vcs::VcsAdapter;
pub use wiki::WikiAdapter;

use lb_core::entities::SourceResult;
use lb_core::enums::SourceKind;
use lb_core::window::TimeWindow;

/// The common adapter contract.
///
/// `fetch` is infallible by design: every failure mode is encoded in the
/// returned [`SourceResult`] so one broken source never aborts aggregation.
pub trait SourceAdapter {
    /// Which source this adapter reads.
    fn kind(&self) -> SourceKind;

    /// Whether the adapter has the credentials/paths it needs. Unconfigured
    /// adapters return a `disabled` result from `fetch`.
    fn is_configured(&self) -> bool;

    /// Fetch activity events inside `window`, noise-filtered.
    fn fetch(&self, window: &TimeWindow) -> impl Future<Output = SourceResult>;
}
