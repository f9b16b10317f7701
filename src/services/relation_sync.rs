//! Relation Syncer - makes the child rows of one video equal a target set
//!
//! Every step is an independent statement against the store. Nothing here is
//! transactional and nothing guards against two syncs for the same video
//! running at once.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, RelationRepository, VideoId};

/// How the store is brought in line with the target set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStrategy {
    /// Delete every row for the owner, then insert the whole target set
    #[default]
    ReplaceAll,
    /// Delete only rows that left the set, insert only rows that joined it
    Diff,
}

impl FromStr for SyncStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" | "replace_all" => Ok(SyncStrategy::ReplaceAll),
            "diff" => Ok(SyncStrategy::Diff),
            other => Err(format!("unknown sync strategy '{}'", other)),
        }
    }
}

/// Which step of a sync failed. The step decides what state was left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Owner id rejected before touching the store
    InvalidOwner(VideoId),
    /// Reading current rows failed (diff strategy only); nothing was changed
    Read(DomainError),
    /// Deleting rows failed; rows that existed before are still there
    Delete(DomainError),
    /// Inserting rows failed after the delete succeeded
    Insert(DomainError),
}

impl SyncError {
    pub fn source_error(&self) -> Option<&DomainError> {
        match self {
            SyncError::InvalidOwner(_) => None,
            SyncError::Read(e) | SyncError::Delete(e) | SyncError::Insert(e) => Some(e),
        }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::InvalidOwner(id) => write!(f, "invalid owner id {}", id),
            SyncError::Read(e) => write!(f, "reading current rows failed: {}", e),
            SyncError::Delete(e) => write!(f, "deleting rows failed: {}", e),
            SyncError::Insert(e) => write!(f, "inserting rows failed: {}", e),
        }
    }
}

impl std::error::Error for SyncError {}

/// What a successful sync changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub removed: u64,
    pub inserted: usize,
}

pub struct RelationSyncer<V: Send + Sync + 'static> {
    repo: Arc<dyn RelationRepository<V>>,
    strategy: SyncStrategy,
    relation: &'static str,
}

impl<V: Send + Sync + 'static> Clone for RelationSyncer<V> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            strategy: self.strategy,
            relation: self.relation,
        }
    }
}

impl<V> RelationSyncer<V>
where
    V: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static,
{
    /// `relation` names the table in log lines ("tags", "sections")
    pub fn new(
        repo: Arc<dyn RelationRepository<V>>,
        strategy: SyncStrategy,
        relation: &'static str,
    ) -> Self {
        Self {
            repo,
            strategy,
            relation,
        }
    }

    pub fn strategy(&self) -> SyncStrategy {
        self.strategy
    }

    pub fn repository(&self) -> &Arc<dyn RelationRepository<V>> {
        &self.repo
    }

    /// Reconcile the rows for `owner` with `target`.
    ///
    /// With `ReplaceAll`, duplicates in `target` are written as duplicate
    /// rows; callers dedupe first if that matters. With `Diff` the target is
    /// treated as a set.
    pub async fn sync(&self, owner: VideoId, target: &[V]) -> Result<SyncReport, SyncError> {
        if owner <= 0 {
            return Err(SyncError::InvalidOwner(owner));
        }

        let result = match self.strategy {
            SyncStrategy::ReplaceAll => self.replace_all(owner, target).await,
            SyncStrategy::Diff => self.apply_diff(owner, target).await,
        };

        match &result {
            Ok(report) => tracing::debug!(
                "Synced {} for video {}: removed={} inserted={}",
                self.relation,
                owner,
                report.removed,
                report.inserted
            ),
            Err(e) => tracing::warn!(
                "Sync of {} for video {} failed: {}",
                self.relation,
                owner,
                e
            ),
        }

        result
    }

    async fn replace_all(&self, owner: VideoId, target: &[V]) -> Result<SyncReport, SyncError> {
        let removed = self.repo.delete_for(owner).await.map_err(SyncError::Delete)?;

        if !target.is_empty() {
            self.repo
                .insert_for(owner, target)
                .await
                .map_err(SyncError::Insert)?;
        }

        Ok(SyncReport {
            removed,
            inserted: target.len(),
        })
    }

    async fn apply_diff(&self, owner: VideoId, target: &[V]) -> Result<SyncReport, SyncError> {
        let current = self.repo.find_for(owner).await.map_err(SyncError::Read)?;
        let delta = diff(&current, target);

        let removed = if delta.removed.is_empty() {
            0
        } else {
            self.repo
                .delete_values(owner, &delta.removed)
                .await
                .map_err(SyncError::Delete)?
        };

        if !delta.added.is_empty() {
            self.repo
                .insert_for(owner, &delta.added)
                .await
                .map_err(SyncError::Insert)?;
        }

        Ok(SyncReport {
            removed,
            inserted: delta.added.len(),
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Delta<V> {
    added: Vec<V>,
    removed: Vec<V>,
}

/// Set difference in both directions, keeping first-seen order.
///
/// Values stored more than once are removed as a whole, then re-added once
/// if they are still wanted, so a diff sync also collapses duplicate rows.
fn diff<V: Clone + Eq + Hash>(current: &[V], target: &[V]) -> Delta<V> {
    let wanted: HashSet<&V> = target.iter().collect();

    let mut seen = HashSet::new();
    let mut duplicated = HashSet::new();
    for value in current {
        if !seen.insert(value) {
            duplicated.insert(value);
        }
    }

    let mut removed = Vec::new();
    let mut removed_seen = HashSet::new();
    for value in current {
        let stale = !wanted.contains(value) || duplicated.contains(value);
        if stale && removed_seen.insert(value) {
            removed.push(value.clone());
        }
    }

    let mut added = Vec::new();
    let mut added_seen = HashSet::new();
    for value in target {
        let missing = !seen.contains(value) || duplicated.contains(value);
        if missing && added_seen.insert(value) {
            added.push(value.clone());
        }
    }

    Delta { added, removed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_diff_added_and_removed() {
        let delta = diff(&strings(&["short", "beginner"]), &strings(&["beginner", "putting"]));
        assert_eq!(delta.removed, strings(&["short"]));
        assert_eq!(delta.added, strings(&["putting"]));
    }

    #[test]
    fn test_diff_no_change() {
        let delta = diff(&[1_i64, 2, 3], &[3, 2, 1]);
        assert!(delta.added.is_empty());
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn test_diff_dedupes_target() {
        let delta = diff(&[], &strings(&["a", "b", "a"]));
        assert_eq!(delta.added, strings(&["a", "b"]));
    }

    #[test]
    fn test_diff_collapses_duplicate_rows() {
        let delta = diff(&strings(&["a", "a", "b"]), &strings(&["a", "b"]));
        assert_eq!(delta.removed, strings(&["a"]));
        assert_eq!(delta.added, strings(&["a"]));
    }

    #[test]
    fn test_diff_to_empty_target() {
        let delta = diff(&[4_i64, 5], &[]);
        assert_eq!(delta.removed, vec![4, 5]);
        assert!(delta.added.is_empty());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("replace".parse::<SyncStrategy>(), Ok(SyncStrategy::ReplaceAll));
        assert_eq!("Diff".parse::<SyncStrategy>(), Ok(SyncStrategy::Diff));
        assert!("merge".parse::<SyncStrategy>().is_err());
    }
}
