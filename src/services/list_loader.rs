//! List Loader - whole-collection fetches backing the video table
//!
//! Every successful fetch replaces the in-memory collection. A failed fetch
//! keeps the previous collection and records the failure, so "empty" and
//! "could not load" stay distinguishable.

use std::sync::Arc;

use crate::domain::{
    DomainError, Section, SectionRepository, TagRepository, Video, VideoId, VideoRepository,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loaded,
    Failed(String),
}

impl LoadStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadStatus::Failed(_))
    }
}

pub struct ListLoader {
    video_repo: Arc<dyn VideoRepository>,
    section_repo: Arc<dyn SectionRepository>,
    tag_repo: Arc<TagRepository>,
    videos: Vec<Video>,
    sections: Vec<Section>,
    video_status: LoadStatus,
    section_status: LoadStatus,
}

impl ListLoader {
    pub fn new(
        video_repo: Arc<dyn VideoRepository>,
        section_repo: Arc<dyn SectionRepository>,
        tag_repo: Arc<TagRepository>,
    ) -> Self {
        Self {
            video_repo,
            section_repo,
            tag_repo,
            videos: Vec::new(),
            sections: Vec::new(),
            video_status: LoadStatus::Idle,
            section_status: LoadStatus::Idle,
        }
    }

    /// Reload videos and sections
    pub async fn refresh(&mut self) {
        self.refresh_videos().await;
        self.refresh_sections().await;
    }

    pub async fn refresh_videos(&mut self) {
        match self.video_repo.find_all().await {
            Ok(videos) => {
                tracing::debug!("Loaded {} video(s)", videos.len());
                self.videos = videos;
                self.video_status = LoadStatus::Loaded;
            }
            Err(e) => {
                tracing::error!("Failed to load videos: {}", e);
                self.video_status = LoadStatus::Failed(e.message());
            }
        }
    }

    pub async fn refresh_sections(&mut self) {
        match self.section_repo.find_all().await {
            Ok(sections) => {
                tracing::debug!("Loaded {} section(s)", sections.len());
                self.sections = sections;
                self.section_status = LoadStatus::Loaded;
            }
            Err(e) => {
                tracing::error!("Failed to load sections: {}", e);
                self.section_status = LoadStatus::Failed(e.message());
            }
        }
    }

    /// Tags for one row, fetched on demand and not cached
    pub async fn tags_for(&self, id: VideoId) -> Result<Vec<String>, DomainError> {
        self.tag_repo.find_for(id).await.inspect_err(|e| {
            tracing::error!("Failed to load tags for video {}: {}", id, e);
        })
    }

    /// Videos, newest id first
    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn video_status(&self) -> &LoadStatus {
        &self.video_status
    }

    pub fn section_status(&self) -> &LoadStatus {
        &self.section_status
    }
}
