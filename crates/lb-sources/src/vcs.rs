//! Version control adapter (local git via `gix`).
//!
//! Walks HEAD ancestry and keeps non-merge commits whose committer time falls
//! inside the window. Changed paths come from a tree diff against the first
//! parent (the empty tree for root commits). Reads only the local repository;
//! no remote access.

use chrono::{DateTime, Utc};
use tracing::warn;

use lb_config::vcs::VcsConfig;
use lb_core::entities::{SourceEvent, SourceResult};
use lb_core::enums::SourceKind;
use lb_core::window::TimeWindow;

use crate::SourceAdapter;
use crate::error::SourceError;
use crate::filter::drop_noise;

/// Upper bound on walked commits per fetch. History is walked newest-first
/// and the walk stops at the window start, so this only matters for
/// pathological repos.
const MAX_COMMITS: usize = 500;

pub struct VcsAdapter {
    config: VcsConfig,
}

impl VcsAdapter {
    #[must_use]
    pub const fn new(config: VcsConfig) -> Self {
        Self { config }
    }

    fn walk(&self, window: &TimeWindow) -> Result<Vec<SourceEvent>, SourceError> {
        let path = if self.config.repo_path.is_empty() {
            std::path::PathBuf::from(".")
        } else {
            std::path::PathBuf::from(&self.config.repo_path)
        };
        let repo = gix::discover(&path).map_err(|e| SourceError::Repo(e.to_string()))?;
        let head_id = repo
            .head_id()
            .map_err(|e| SourceError::Repo(e.to_string()))?;

        let walk = repo
            .rev_walk([head_id.detach()])
            .all()
            .map_err(|e| SourceError::Repo(e.to_string()))?;

        let mut events = Vec::new();
        for info in walk.take(MAX_COMMITS) {
            let info = info.map_err(|e| SourceError::Repo(e.to_string()))?;
            let commit = repo
                .find_commit(info.id)
                .map_err(|e| SourceError::Repo(e.to_string()))?;

            let Some(ts) = commit
                .time()
                .ok()
                .and_then(|t| DateTime::from_timestamp(t.seconds, 0))
            else {
                continue;
            };
            if ts < window.start {
                // Ancestry is walked newest-first; everything older is out.
                break;
            }
            if !window.contains(ts) {
                continue;
            }
            if commit.parent_ids().count() > 1 {
                continue; // merge commit
            }

            events.push(commit_event(&repo, &commit, ts)?);
        }
        Ok(drop_noise(events))
    }
}

impl SourceAdapter for VcsAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Vcs
    }

    fn is_configured(&self) -> bool {
        self.config.enabled
    }

    async fn fetch(&self, window: &TimeWindow) -> SourceResult {
        if !self.is_configured() {
            return SourceResult::disabled(SourceKind::Vcs);
        }
        match self.walk(window) {
            Ok(events) => SourceResult::success(SourceKind::Vcs, events),
            Err(e) => {
                warn!(source = "vcs", %e, "source fetch failed");
                SourceResult::failed(SourceKind::Vcs, e.to_string())
            }
        }
    }
}

fn commit_event(
    repo: &gix::Repository,
    commit: &gix::Commit<'_>,
    ts: DateTime<Utc>,
) -> Result<SourceEvent, SourceError> {
    let message = commit.message_raw_sloppy().to_string();
    let (title, body) = match message.split_once('\n') {
        Some((title, body)) => (title.trim().to_string(), body.trim().to_string()),
        None => (message.trim().to_string(), String::new()),
    };
    let author = commit
        .author()
        .ok()
        .map(|sig| sig.name.to_string());

    let tree = commit
        .tree()
        .map_err(|e| SourceError::Repo(e.to_string()))?;
    let parent_tree = match commit.parent_ids().next() {
        Some(parent_id) => repo
            .find_commit(parent_id)
            .map_err(|e| SourceError::Repo(e.to_string()))?
            .tree()
            .map_err(|e| SourceError::Repo(e.to_string()))?,
        None => repo.empty_tree(),
    };
    let changes = repo
        .diff_tree_to_tree(Some(&parent_tree), Some(&tree), None)
        .map_err(|e| SourceError::Repo(e.to_string()))?;
    let paths = changes
        .iter()
        .map(|change| change.location().to_string())
        .collect();

    Ok(SourceEvent {
        id: format!("git-{}", commit.id),
        source: SourceKind::Vcs,
        ts,
        author,
        title,
        body,
        refs: vec![],
        paths,
        url: None,
        change: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::path::Path;
    use std::process::Command;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_NAME", "Priya N")
            .env("GIT_AUTHOR_EMAIL", "priya@acme.dev")
            .env("GIT_COMMITTER_NAME", "Priya N")
            .env("GIT_COMMITTER_EMAIL", "priya@acme.dev")
            .status()
            .expect("git should run");
        assert!(status.success(), "git {args:?} failed");
    }

    fn repo_with_commits() -> TempDir {
        let dir = TempDir::new().unwrap();
        git(dir.path(), &["init", "-q"]);
        std::fs::write(dir.path().join("billing.rs"), "fn main() {}\n").unwrap();
        git(dir.path(), &["add", "."]);
        git(dir.path(), &["commit", "-q", "-m", "finish billing migration"]);
        std::fs::write(dir.path().join("keys.rs"), "// rotate\n").unwrap();
        git(dir.path(), &["add", "."]);
        git(
            dir.path(),
            &["commit", "-q", "-m", "rotate api keys\n\ncloses PROJ-51"],
        );
        dir
    }

    #[tokio::test]
    async fn walks_recent_commits_with_paths() {
        let dir = repo_with_commits();
        let adapter = VcsAdapter::new(VcsConfig {
            repo_path: dir.path().display().to_string(),
            enabled: true,
        });
        let window = TimeWindow::ending_at(Utc::now() + Duration::minutes(1), Duration::hours(1));
        let result = adapter.fetch(&window).await;

        assert_eq!(result.status, lb_core::enums::SourceStatus::Success);
        assert_eq!(result.events.len(), 2);
        // Newest first.
        assert_eq!(result.events[0].title, "rotate api keys");
        assert_eq!(result.events[0].body, "closes PROJ-51");
        assert_eq!(result.events[0].paths, vec!["keys.rs"]);
        assert_eq!(result.events[1].paths, vec!["billing.rs"]);
        assert_eq!(result.events[1].author.as_deref(), Some("Priya N"));
    }

    #[tokio::test]
    async fn old_window_yields_no_events() {
        let dir = repo_with_commits();
        let adapter = VcsAdapter::new(VcsConfig {
            repo_path: dir.path().display().to_string(),
            enabled: true,
        });
        let window =
            TimeWindow::ending_at(Utc::now() - Duration::days(30), Duration::hours(24));
        let result = adapter.fetch(&window).await;
        assert_eq!(result.status, lb_core::enums::SourceStatus::Success);
        assert!(result.events.is_empty());
    }

    #[tokio::test]
    async fn missing_repo_is_failed_not_fatal() {
        let dir = TempDir::new().unwrap();
        let adapter = VcsAdapter::new(VcsConfig {
            repo_path: dir.path().display().to_string(),
            enabled: true,
        });
        let window = TimeWindow::ending_at(Utc::now(), Duration::hours(24));
        let result = adapter.fetch(&window).await;
        assert_eq!(result.status, lb_core::enums::SourceStatus::Failed);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn disabled_by_config() {
        let adapter = VcsAdapter::new(VcsConfig {
            repo_path: String::new(),
            enabled: false,
        });
        let window = TimeWindow::ending_at(Utc::now(), Duration::hours(24));
        let result = adapter.fetch(&window).await;
        assert_eq!(result.status, lb_core::enums::SourceStatus::Disabled);
    }
}
