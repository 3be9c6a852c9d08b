//! Concurrent snapshot assembly.
//!
//! Fires every enabled adapter with `tokio::join!`, each under its own time
//! budget. A source that times out or fails contributes a `failed` sub-result
//! and nothing else; the snapshot is valid with zero successes.

use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;

use lb_config::LogbookConfig;
use lb_core::entities::{ContextSnapshot, SourceResult, TaskRecord};
use lb_core::enums::SourceKind;
use lb_core::window::{Period, TimeWindow};
use lb_sources::{ChatAdapter, SourceAdapter, TrackerAdapter, VcsAdapter, WikiAdapter};

use crate::linker::link_events;

pub struct Aggregator {
    chat: ChatAdapter,
    tracker: TrackerAdapter,
    wiki: WikiAdapter,
    vcs: VcsAdapter,
    budget: Duration,
}

impl Aggregator {
    /// Build all adapters from config. One shared HTTP client.
    #[must_use]
    pub fn from_config(config: &LogbookConfig) -> Self {
        let http = lb_sources::http_client(config.general.adapter_timeout_secs);
        Self {
            chat: ChatAdapter::new(http.clone(), config.chat.clone()),
            tracker: TrackerAdapter::new(http.clone(), config.tracker.clone()),
            wiki: WikiAdapter::new(http, config.wiki.clone()),
            vcs: VcsAdapter::new(config.vcs.clone()),
            budget: Duration::from_secs(config.general.adapter_timeout_secs),
        }
    }

    /// Fetch all sources concurrently and assemble the linked snapshot.
    pub async fn run(
        &self,
        period: Period,
        window: TimeWindow,
        records: &[TaskRecord],
    ) -> ContextSnapshot {
        self.run_selected(period, window, records, &SourceKind::ALL)
            .await
    }

    /// Like [`Aggregator::run`], but fetch only `selected` sources. The rest
    /// contribute `disabled` sub-results so the snapshot keeps its fixed
    /// source order.
    pub async fn run_selected(
        &self,
        period: Period,
        window: TimeWindow,
        records: &[TaskRecord],
        selected: &[SourceKind],
    ) -> ContextSnapshot {
        let (chat, tracker, wiki, vcs) = tokio::join!(
            guard_selected(&self.chat, &window, self.budget, selected),
            guard_selected(&self.tracker, &window, self.budget, selected),
            guard_selected(&self.wiki, &window, self.budget, selected),
            guard_selected(&self.vcs, &window, self.budget, selected),
        );
        assemble(period, window, vec![chat, tracker, wiki, vcs], records)
    }
}

async fn guard_selected<A: SourceAdapter>(
    adapter: &A,
    window: &TimeWindow,
    budget: Duration,
    selected: &[SourceKind],
) -> SourceResult {
    if selected.contains(&adapter.kind()) {
        guard(adapter, window, budget).await
    } else {
        SourceResult::disabled(adapter.kind())
    }
}

/// Run one adapter under its time budget. A timeout is a failure of that
/// source only.
pub async fn guard<A: SourceAdapter>(
    adapter: &A,
    window: &TimeWindow,
    budget: Duration,
) -> SourceResult {
    match timeout(budget, adapter.fetch(window)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(source = %adapter.kind(), "source timed out");
            SourceResult::failed(
                adapter.kind(),
                format!("timed out after {}s", budget.as_secs()),
            )
        }
    }
}

/// Pure assembly step: sub-results plus records become a linked snapshot.
#[must_use]
pub fn assemble(
    period: Period,
    window: TimeWindow,
    sources: Vec<SourceResult>,
    records: &[TaskRecord],
) -> ContextSnapshot {
    let events: Vec<_> = sources
        .iter()
        .flat_map(|s| s.events.iter().cloned())
        .collect();
    ContextSnapshot {
        window,
        period,
        generated_at: Utc::now(),
        links: link_events(records, &events),
        sources,
    }
}
