use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use video_catalog::db;
use video_catalog::domain::{DomainError, RelationRepository, SectionId, VideoId};
use video_catalog::infrastructure::{SeaOrmSectionLinkRepository, SeaOrmTagRepository};
use video_catalog::services::{RelationSyncer, SyncError, SyncStrategy};

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn as_set<T: std::hash::Hash + Eq + Clone>(values: &[T]) -> HashSet<T> {
    values.iter().cloned().collect()
}

/// Delegates to a real repository, failing the chosen step
struct FailingRepo<V: Send + Sync + 'static> {
    inner: Arc<dyn RelationRepository<V>>,
    fail_delete: bool,
    fail_insert: bool,
}

#[async_trait]
impl<V: Send + Sync + 'static> RelationRepository<V> for FailingRepo<V> {
    async fn find_for(&self, owner: VideoId) -> Result<Vec<V>, DomainError> {
        self.inner.find_for(owner).await
    }

    async fn delete_for(&self, owner: VideoId) -> Result<u64, DomainError> {
        if self.fail_delete {
            return Err(DomainError::External("delete rejected".to_string()));
        }
        self.inner.delete_for(owner).await
    }

    async fn delete_values(&self, owner: VideoId, values: &[V]) -> Result<u64, DomainError> {
        if self.fail_delete {
            return Err(DomainError::External("delete rejected".to_string()));
        }
        self.inner.delete_values(owner, values).await
    }

    async fn insert_for(&self, owner: VideoId, values: &[V]) -> Result<(), DomainError> {
        if self.fail_insert {
            return Err(DomainError::External("insert rejected".to_string()));
        }
        self.inner.insert_for(owner, values).await
    }

    async fn delete_for_many(&self, owners: &[VideoId]) -> Result<u64, DomainError> {
        self.inner.delete_for_many(owners).await
    }
}

#[tokio::test]
async fn test_tag_sync_yields_exact_target() {
    let db = setup_test_db().await;
    let repo: Arc<dyn RelationRepository<String>> = Arc::new(SeaOrmTagRepository::new(db));

    for strategy in [SyncStrategy::ReplaceAll, SyncStrategy::Diff] {
        let syncer = RelationSyncer::new(repo.clone(), strategy, "tags");
        let owner = match strategy {
            SyncStrategy::ReplaceAll => 1,
            SyncStrategy::Diff => 2,
        };

        for target in [
            strings(&["short", "beginner"]),
            strings(&["beginner", "putting", "drills"]),
            strings(&[]),
            strings(&["chipping"]),
        ] {
            syncer.sync(owner, &target).await.expect("sync failed");
            let stored = repo.find_for(owner).await.unwrap();
            assert_eq!(stored.len(), target.len(), "{:?}", strategy);
            assert_eq!(as_set(&stored), as_set(&target), "{:?}", strategy);
        }
    }
}

#[tokio::test]
async fn test_section_sync_yields_exact_target() {
    let db = setup_test_db().await;
    let repo: Arc<dyn RelationRepository<SectionId>> =
        Arc::new(SeaOrmSectionLinkRepository::new(db));

    for strategy in [SyncStrategy::ReplaceAll, SyncStrategy::Diff] {
        let syncer = RelationSyncer::new(repo.clone(), strategy, "sections");

        for target in [vec![1, 2, 3], vec![3, 4], vec![], vec![2]] {
            syncer.sync(10, &target).await.expect("sync failed");
            let stored = repo.find_for(10).await.unwrap();
            assert_eq!(as_set(&stored), as_set(&target));
        }
    }
}

#[tokio::test]
async fn test_sync_is_idempotent() {
    let db = setup_test_db().await;
    let repo: Arc<dyn RelationRepository<String>> = Arc::new(SeaOrmTagRepository::new(db));
    let target = strings(&["short", "beginner"]);

    for strategy in [SyncStrategy::ReplaceAll, SyncStrategy::Diff] {
        let syncer = RelationSyncer::new(repo.clone(), strategy, "tags");
        syncer.sync(5, &target).await.unwrap();
        let once = repo.find_for(5).await.unwrap();
        syncer.sync(5, &target).await.unwrap();
        let twice = repo.find_for(5).await.unwrap();

        assert_eq!(once.len(), twice.len());
        assert_eq!(as_set(&once), as_set(&twice));
    }

    // A repeated diff sync has nothing to do
    let syncer = RelationSyncer::new(repo.clone(), SyncStrategy::Diff, "tags");
    let report = syncer.sync(5, &target).await.unwrap();
    assert_eq!(report.removed, 0);
    assert_eq!(report.inserted, 0);
}

#[tokio::test]
async fn test_sync_leaves_other_owners_alone() {
    let db = setup_test_db().await;
    let repo: Arc<dyn RelationRepository<String>> = Arc::new(SeaOrmTagRepository::new(db));
    let syncer = RelationSyncer::new(repo.clone(), SyncStrategy::ReplaceAll, "tags");

    syncer.sync(1, &strings(&["a", "b"])).await.unwrap();
    syncer.sync(2, &strings(&["c"])).await.unwrap();
    syncer.sync(1, &strings(&[])).await.unwrap();

    assert!(repo.find_for(1).await.unwrap().is_empty());
    assert_eq!(repo.find_for(2).await.unwrap(), strings(&["c"]));
}

#[tokio::test]
async fn test_replace_all_keeps_duplicates_diff_collapses_them() {
    let db = setup_test_db().await;
    let repo: Arc<dyn RelationRepository<String>> = Arc::new(SeaOrmTagRepository::new(db));

    let replace = RelationSyncer::new(repo.clone(), SyncStrategy::ReplaceAll, "tags");
    replace.sync(3, &strings(&["a", "a", "b"])).await.unwrap();
    assert_eq!(repo.find_for(3).await.unwrap().len(), 3);

    let diff = RelationSyncer::new(repo.clone(), SyncStrategy::Diff, "tags");
    diff.sync(3, &strings(&["a", "b"])).await.unwrap();
    let stored = repo.find_for(3).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(as_set(&stored), as_set(&strings(&["a", "b"])));
}

#[tokio::test]
async fn test_delete_failure_keeps_previous_rows() {
    let db = setup_test_db().await;
    let inner: Arc<dyn RelationRepository<String>> = Arc::new(SeaOrmTagRepository::new(db));
    RelationSyncer::new(inner.clone(), SyncStrategy::ReplaceAll, "tags")
        .sync(1, &strings(&["short", "beginner"]))
        .await
        .unwrap();

    let failing: Arc<dyn RelationRepository<String>> = Arc::new(FailingRepo {
        inner: inner.clone(),
        fail_delete: true,
        fail_insert: false,
    });

    for strategy in [SyncStrategy::ReplaceAll, SyncStrategy::Diff] {
        let syncer = RelationSyncer::new(failing.clone(), strategy, "tags");
        let err = syncer.sync(1, &strings(&["beginner"])).await.unwrap_err();
        assert!(matches!(err, SyncError::Delete(_)));

        let stored = inner.find_for(1).await.unwrap();
        assert_eq!(as_set(&stored), as_set(&strings(&["short", "beginner"])));
    }
}

#[tokio::test]
async fn test_insert_failure_after_delete_leaves_relation_empty() {
    let db = setup_test_db().await;
    let inner: Arc<dyn RelationRepository<String>> = Arc::new(SeaOrmTagRepository::new(db));
    RelationSyncer::new(inner.clone(), SyncStrategy::ReplaceAll, "tags")
        .sync(1, &strings(&["short"]))
        .await
        .unwrap();

    let failing: Arc<dyn RelationRepository<String>> = Arc::new(FailingRepo {
        inner: inner.clone(),
        fail_delete: false,
        fail_insert: true,
    });
    let syncer = RelationSyncer::new(failing, SyncStrategy::ReplaceAll, "tags");

    let err = syncer.sync(1, &strings(&["beginner"])).await.unwrap_err();
    assert!(matches!(err, SyncError::Insert(_)));
    assert!(inner.find_for(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_diff_insert_failure_only_loses_removed_values() {
    let db = setup_test_db().await;
    let inner: Arc<dyn RelationRepository<String>> = Arc::new(SeaOrmTagRepository::new(db));
    RelationSyncer::new(inner.clone(), SyncStrategy::ReplaceAll, "tags")
        .sync(1, &strings(&["short", "beginner"]))
        .await
        .unwrap();

    let failing: Arc<dyn RelationRepository<String>> = Arc::new(FailingRepo {
        inner: inner.clone(),
        fail_delete: false,
        fail_insert: true,
    });
    let syncer = RelationSyncer::new(failing, SyncStrategy::Diff, "tags");

    let err = syncer
        .sync(1, &strings(&["beginner", "putting"]))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Insert(_)));
    assert_eq!(inner.find_for(1).await.unwrap(), strings(&["beginner"]));
}

#[tokio::test]
async fn test_invalid_owner_is_rejected() {
    let db = setup_test_db().await;
    let repo: Arc<dyn RelationRepository<String>> = Arc::new(SeaOrmTagRepository::new(db));
    let syncer = RelationSyncer::new(repo, SyncStrategy::ReplaceAll, "tags");

    let err = syncer.sync(0, &strings(&["a"])).await.unwrap_err();
    assert_eq!(err, SyncError::InvalidOwner(0));
}
