//! Services Layer
//!
//! Catalog logic independent of the HTTP layer: the relation syncer, the
//! video save sequence, the form controller and the list loader.

pub mod list_loader;
pub mod relation_sync;
pub mod section_service;
pub mod video_form;
pub mod video_service;

// Re-export for convenience
pub use list_loader::{ListLoader, LoadStatus};
pub use relation_sync::{RelationSyncer, SyncError, SyncReport, SyncStrategy};
pub use video_form::{FormMode, SubmitError, VideoForm};
pub use video_service::{
    BulkDeleteReport, EditableVideo, RelationKind, RelationWarning, SaveMode, SaveOutcome,
    VideoDraft, VideoService,
};
