//! Application state containing repositories and shared resources
//!
//! This is the composition root: the store handle (SeaORM connection or
//! PostgREST client) is built once and injected into every repository.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{SectionLinkRepository, SectionRepository, TagRepository, VideoRepository};
use crate::infrastructure::supabase::SupabaseClient;
use crate::infrastructure::{
    RestRelationRepository, RestSectionRepository, RestVideoRepository, SeaOrmSectionLinkRepository,
    SeaOrmSectionRepository, SeaOrmTagRepository, SeaOrmVideoRepository,
};
use crate::services::{ListLoader, RelationSyncer, SyncStrategy, VideoService};

/// Behavior switches read from configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct StateOptions {
    pub sync_strategy: SyncStrategy,
    pub cascade_bulk_delete: bool,
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Video repository
    pub video_repo: Arc<dyn VideoRepository>,
    /// Section repository
    pub section_repo: Arc<dyn SectionRepository>,
    /// Tag rows per video
    pub tag_repo: Arc<TagRepository>,
    /// Section links per video
    pub section_link_repo: Arc<SectionLinkRepository>,
    /// Save sequence and bulk delete
    pub videos: VideoService,
}

impl AppState {
    /// Repositories backed by a direct SQL connection
    pub fn with_database(db: DatabaseConnection, options: StateOptions) -> Self {
        Self::from_repositories(
            Arc::new(SeaOrmVideoRepository::new(db.clone())),
            Arc::new(SeaOrmSectionRepository::new(db.clone())),
            Arc::new(SeaOrmTagRepository::new(db.clone())),
            Arc::new(SeaOrmSectionLinkRepository::new(db)),
            options,
        )
    }

    /// Repositories backed by the hosted PostgREST endpoint
    pub fn with_supabase(client: SupabaseClient, options: StateOptions) -> Self {
        Self::from_repositories(
            Arc::new(RestVideoRepository::new(client.clone())),
            Arc::new(RestSectionRepository::new(client.clone())),
            Arc::new(RestRelationRepository::tags(client.clone())),
            Arc::new(RestRelationRepository::section_links(client)),
            options,
        )
    }

    pub fn from_repositories(
        video_repo: Arc<dyn VideoRepository>,
        section_repo: Arc<dyn SectionRepository>,
        tag_repo: Arc<TagRepository>,
        section_link_repo: Arc<SectionLinkRepository>,
        options: StateOptions,
    ) -> Self {
        let videos = VideoService::new(
            video_repo.clone(),
            RelationSyncer::new(tag_repo.clone(), options.sync_strategy, "tags"),
            RelationSyncer::new(section_link_repo.clone(), options.sync_strategy, "sections"),
            options.cascade_bulk_delete,
        );

        Self {
            video_repo,
            section_repo,
            tag_repo,
            section_link_repo,
            videos,
        }
    }

    /// A fresh list loader over the same repositories
    pub fn list_loader(&self) -> ListLoader {
        ListLoader::new(
            self.video_repo.clone(),
            self.section_repo.clone(),
            self.tag_repo.clone(),
        )
    }
}
