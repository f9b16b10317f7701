//! Video Service - primary write followed by the two relation syncs
//!
//! Used both by the HTTP handlers and by the in-process form controller.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, SectionId, Video, VideoFields, VideoId, VideoRepository};
use crate::services::relation_sync::{RelationSyncer, SyncError};

/// Draft of one video: scalar fields plus the two related sets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoDraft {
    #[serde(flatten)]
    pub fields: VideoFields,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub section_ids: Vec<SectionId>,
}

impl VideoDraft {
    /// Add a tag unless it is blank or already present. Returns whether the
    /// draft grew.
    pub fn add_tag(&mut self, text: &str) -> bool {
        let tag = text.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, text: &str) {
        self.tags.retain(|t| t != text);
    }

    /// Checkbox semantics: select if absent, deselect if present
    pub fn toggle_section(&mut self, id: SectionId) {
        if let Some(pos) = self.section_ids.iter().position(|s| *s == id) {
            self.section_ids.remove(pos);
        } else {
            self.section_ids.push(id);
        }
    }
}

/// Add path or edit path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Add,
    Edit(VideoId),
}

impl SaveMode {
    fn verb(self) -> &'static str {
        match self {
            SaveMode::Add => "created",
            SaveMode::Edit(_) => "updated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Tags,
    Sections,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Tags => write!(f, "tags"),
            RelationKind::Sections => write!(f, "sections"),
        }
    }
}

/// A relation sync that failed after the primary write committed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationWarning {
    pub relation: RelationKind,
    /// User-facing partial-success message
    pub message: String,
    /// Underlying store error
    pub error: String,
}

impl RelationWarning {
    fn new(relation: RelationKind, mode: SaveMode, error: &SyncError) -> Self {
        let action = match relation {
            RelationKind::Tags => "add tags",
            RelationKind::Sections => "link to sections",
        };
        Self {
            relation,
            message: format!("Video {}, but failed to {}.", mode.verb(), action),
            error: error
                .source_error()
                .map(DomainError::message)
                .unwrap_or_else(|| error.to_string()),
        }
    }
}

/// Result of a save whose primary write succeeded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveOutcome {
    pub video: Video,
    pub warnings: Vec<RelationWarning>,
}

impl SaveOutcome {
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A video as loaded into the edit form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditableVideo {
    pub video: Video,
    pub tags: Vec<String>,
    pub section_ids: Vec<SectionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkDeleteReport {
    pub deleted: u64,
    pub tags_removed: u64,
    pub section_links_removed: u64,
}

#[derive(Clone)]
pub struct VideoService {
    videos: Arc<dyn VideoRepository>,
    tags: RelationSyncer<String>,
    sections: RelationSyncer<SectionId>,
    cascade_bulk_delete: bool,
}

impl VideoService {
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        tags: RelationSyncer<String>,
        sections: RelationSyncer<SectionId>,
        cascade_bulk_delete: bool,
    ) -> Self {
        Self {
            videos,
            tags,
            sections,
            cascade_bulk_delete,
        }
    }

    pub fn videos(&self) -> &Arc<dyn VideoRepository> {
        &self.videos
    }

    /// Write the primary row, then sync tags, then sync section links.
    ///
    /// An `Err` means nothing was written. A relation failure does not undo
    /// the primary write or the other relation; it shows up as a warning.
    pub async fn save(
        &self,
        mode: SaveMode,
        draft: &VideoDraft,
    ) -> Result<SaveOutcome, DomainError> {
        draft.fields.validate()?;

        if !(1..=3).contains(&draft.fields.skill) {
            tracing::warn!(
                "Saving video '{}' with skill {} outside 1..=3",
                draft.fields.title,
                draft.fields.skill
            );
        }

        let video = match mode {
            SaveMode::Add => self.videos.create(draft.fields.clone()).await?,
            SaveMode::Edit(id) => self.videos.update(id, draft.fields.clone()).await?,
        };
        tracing::info!("Video {} {}", video.id, mode.verb());

        let mut warnings = Vec::new();

        if let Err(e) = self.tags.sync(video.id, &draft.tags).await {
            warnings.push(RelationWarning::new(RelationKind::Tags, mode, &e));
        }

        // Section links are keyed by (section_id, video_id)
        let section_ids = unique(&draft.section_ids);
        if let Err(e) = self.sections.sync(video.id, &section_ids).await {
            warnings.push(RelationWarning::new(RelationKind::Sections, mode, &e));
        }

        Ok(SaveOutcome { video, warnings })
    }

    /// Load a video with its current tags and section ids
    pub async fn load_for_edit(&self, id: VideoId) -> Result<EditableVideo, DomainError> {
        let video = self
            .videos
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound)?;
        let tags = self.tags.repository().find_for(id).await?;
        let section_ids = self.sections.repository().find_for(id).await?;

        Ok(EditableVideo {
            video,
            tags,
            section_ids,
        })
    }

    pub async fn tags_for(&self, id: VideoId) -> Result<Vec<String>, DomainError> {
        self.tags.repository().find_for(id).await
    }

    /// Delete the selected videos by id.
    ///
    /// Relation rows are only removed when cascading is switched on;
    /// otherwise they are left orphaned.
    pub async fn bulk_delete(&self, ids: &[VideoId]) -> Result<BulkDeleteReport, DomainError> {
        if ids.is_empty() {
            return Ok(BulkDeleteReport {
                deleted: 0,
                tags_removed: 0,
                section_links_removed: 0,
            });
        }

        let (tags_removed, section_links_removed) = if self.cascade_bulk_delete {
            (
                self.tags.repository().delete_for_many(ids).await?,
                self.sections.repository().delete_for_many(ids).await?,
            )
        } else {
            tracing::warn!(
                "Bulk delete of {} video(s) leaves their tag and section rows in place",
                ids.len()
            );
            (0, 0)
        };

        let deleted = self.videos.delete_many(ids).await?;
        tracing::info!("Bulk deleted {} video(s)", deleted);

        Ok(BulkDeleteReport {
            deleted,
            tags_removed,
            section_links_removed,
        })
    }
}

/// Drop repeated values, first occurrence wins
fn unique<V: Copy + Eq + Hash>(values: &[V]) -> Vec<V> {
    let mut seen = HashSet::new();
    values.iter().copied().filter(|v| seen.insert(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_tag_ignores_duplicates_and_blanks() {
        let mut draft = VideoDraft::default();
        assert!(draft.add_tag("beginner"));
        assert!(draft.add_tag(" short "));
        assert!(!draft.add_tag("beginner"));
        assert!(!draft.add_tag("short"));
        assert!(!draft.add_tag("   "));
        assert_eq!(draft.tags, vec!["beginner", "short"]);
    }

    #[test]
    fn test_remove_tag() {
        let mut draft = VideoDraft::default();
        draft.add_tag("a");
        draft.add_tag("b");
        draft.remove_tag("a");
        draft.remove_tag("missing");
        assert_eq!(draft.tags, vec!["b"]);
    }

    #[test]
    fn test_toggle_section() {
        let mut draft = VideoDraft::default();
        draft.toggle_section(3);
        draft.toggle_section(5);
        draft.toggle_section(3);
        assert_eq!(draft.section_ids, vec![5]);
    }

    #[test]
    fn test_unique_keeps_first_occurrence() {
        assert_eq!(unique(&[2_i64, 2]), vec![2]);
        assert_eq!(unique(&[3_i64, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(unique::<i64>(&[]).is_empty());
    }

    #[test]
    fn test_warning_messages() {
        let err = SyncError::Insert(DomainError::External("boom".to_string()));
        let w = RelationWarning::new(RelationKind::Tags, SaveMode::Add, &err);
        assert_eq!(w.message, "Video created, but failed to add tags.");
        assert_eq!(w.error, "boom");

        let w = RelationWarning::new(RelationKind::Sections, SaveMode::Edit(7), &err);
        assert_eq!(w.message, "Video updated, but failed to link to sections.");
    }

    #[test]
    fn test_draft_deserializes_flat_payload() {
        let draft: VideoDraft = serde_json::from_value(serde_json::json!({
            "title": "Putting Basics",
            "video_ref": "abc123",
            "tags": ["short", "beginner"]
        }))
        .unwrap();

        assert_eq!(draft.fields.title, "Putting Basics");
        assert_eq!(draft.fields.skill, 1);
        assert!(!draft.fields.watched_fully);
        assert_eq!(draft.tags, vec!["short", "beginner"]);
        assert!(draft.section_ids.is_empty());
    }
}
