//! Entity types and repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer: one set backed by the
//! PostgREST endpoint, one set backed by a direct SeaORM connection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DomainError;

pub type VideoId = i64;
pub type SectionId = i64;

/// Optional category flags carried on a video row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFlags {
    #[serde(default)]
    pub ott: bool,
    #[serde(default)]
    pub app: bool,
    #[serde(default)]
    pub arg: bool,
    #[serde(default)]
    pub putt: bool,
}

/// Scalar fields of a video, as written on insert and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// External video reference (a YouTube id or link)
    pub video_ref: String,
    #[serde(default)]
    pub section_title: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default = "default_skill")]
    pub skill: i32,
    #[serde(default)]
    pub watched_fully: bool,
    #[serde(flatten)]
    pub categories: CategoryFlags,
}

fn default_skill() -> i32 {
    1
}

impl Default for VideoFields {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            video_ref: String::new(),
            section_title: None,
            duration: None,
            skill: default_skill(),
            watched_fully: false,
            categories: CategoryFlags::default(),
        }
    }
}

impl VideoFields {
    /// Thin boundary validation: only the two required inputs are checked.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("Video title is required".to_string()));
        }
        if self.video_ref.trim().is_empty() {
            return Err(DomainError::Validation(
                "Video reference is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// A stored video row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    #[serde(flatten)]
    pub fields: VideoFields,
}

/// A stored section row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skill: String,
}

/// Input for creating a section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSection {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skill: String,
}

/// Repository trait for Video entity
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Find all videos, newest id first
    async fn find_all(&self) -> Result<Vec<Video>, DomainError>;

    /// Find a single video by ID
    async fn find_by_id(&self, id: VideoId) -> Result<Option<Video>, DomainError>;

    /// Insert a video and return the stored row with its assigned id
    async fn create(&self, fields: VideoFields) -> Result<Video, DomainError>;

    /// Update the scalar fields of an existing video
    async fn update(&self, id: VideoId, fields: VideoFields) -> Result<Video, DomainError>;

    /// Delete every video whose id is in `ids`, returning the number removed.
    /// Relation rows are left untouched.
    async fn delete_many(&self, ids: &[VideoId]) -> Result<u64, DomainError>;
}

/// Repository trait for Section entity
#[async_trait]
pub trait SectionRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Section>, DomainError>;

    async fn create(&self, input: NewSection) -> Result<Section, DomainError>;
}

/// Child rows owned by a video: one row per (video_id, value).
///
/// `V` is the related value, a tag string for the tag table and a section id
/// for the join table.
#[async_trait]
pub trait RelationRepository<V>: Send + Sync
where
    V: Send + Sync + 'static,
{
    /// Values of every row referencing `owner`
    async fn find_for(&self, owner: VideoId) -> Result<Vec<V>, DomainError>;

    /// Delete every row referencing `owner`
    async fn delete_for(&self, owner: VideoId) -> Result<u64, DomainError>;

    /// Delete the rows referencing `owner` whose value is in `values`
    async fn delete_values(&self, owner: VideoId, values: &[V]) -> Result<u64, DomainError>;

    /// Insert one row per value, each carrying `owner`
    async fn insert_for(&self, owner: VideoId, values: &[V]) -> Result<(), DomainError>;

    /// Delete every row referencing any of `owners`
    async fn delete_for_many(&self, owners: &[VideoId]) -> Result<u64, DomainError>;
}

pub type TagRepository = dyn RelationRepository<String>;
pub type SectionLinkRepository = dyn RelationRepository<SectionId>;
