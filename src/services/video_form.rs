//! Entity Form Controller - draft state for the add/edit video form
//!
//! State machine: `Closed -> Adding` or `Closed -> Editing(id)`, and back to
//! `Closed` on successful submit or cancel. A failed primary write keeps the
//! form open with the draft intact so the user can retry.

use std::fmt;

use crate::domain::{DomainError, SectionId, VideoFields, VideoId};
use crate::services::list_loader::ListLoader;
use crate::services::video_service::{
    EditableVideo, SaveMode, SaveOutcome, VideoDraft, VideoService,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Closed,
    Adding,
    Editing(VideoId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// A submit is already in flight
    AlreadySaving,
    /// The form is closed
    NotOpen,
    /// The primary write failed; nothing was written
    Primary(DomainError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::AlreadySaving => write!(f, "A save is already in progress"),
            SubmitError::NotOpen => write!(f, "The form is not open"),
            SubmitError::Primary(e) => write!(f, "{}", e.message()),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Holds the in-flight flag for one submit. Clears it when dropped, so a
/// submit future that is abandoned mid-save does not leave the form stuck.
struct SavingGuard<'a>(&'a mut bool);

impl<'a> SavingGuard<'a> {
    fn engage(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[derive(Debug, Default)]
pub struct VideoForm {
    mode: FormMode,
    draft: VideoDraft,
    saving: bool,
    message: Option<String>,
}

impl VideoForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != FormMode::Closed
    }

    /// True while a submit is outstanding; the submit control is disabled
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Last error or partial-success message shown to the user
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn draft(&self) -> &VideoDraft {
        &self.draft
    }

    pub fn fields_mut(&mut self) -> &mut VideoFields {
        &mut self.draft.fields
    }

    pub fn open_add(&mut self) {
        self.mode = FormMode::Adding;
        self.draft = VideoDraft::default();
        self.message = None;
        self.saving = false;
    }

    pub fn open_edit(&mut self, editable: EditableVideo) {
        self.mode = FormMode::Editing(editable.video.id);
        self.draft = VideoDraft {
            fields: editable.video.fields,
            tags: editable.tags,
            section_ids: editable.section_ids,
        };
        self.message = None;
        self.saving = false;
    }

    /// Close without saving; nothing is written
    pub fn cancel(&mut self) {
        self.mode = FormMode::Closed;
        self.saving = false;
    }

    pub fn add_tag(&mut self, text: &str) -> bool {
        self.draft.add_tag(text)
    }

    pub fn remove_tag(&mut self, text: &str) {
        self.draft.remove_tag(text);
    }

    pub fn toggle_section(&mut self, id: SectionId) {
        self.draft.toggle_section(id);
    }

    /// Save the draft, then refresh the list.
    ///
    /// On `Err(Primary)` the form stays open and the draft is untouched. On
    /// `Ok` the list is reloaded, the draft cleared and the form closed, even
    /// if a relation sync failed (the outcome then carries warnings and the
    /// message is set).
    pub async fn submit(
        &mut self,
        service: &VideoService,
        list: &mut ListLoader,
    ) -> Result<SaveOutcome, SubmitError> {
        if self.saving {
            return Err(SubmitError::AlreadySaving);
        }
        let mode = match self.mode {
            FormMode::Closed => return Err(SubmitError::NotOpen),
            FormMode::Adding => SaveMode::Add,
            FormMode::Editing(id) => SaveMode::Edit(id),
        };

        self.message = None;
        let result = {
            let _saving = SavingGuard::engage(&mut self.saving);
            service.save(mode, &self.draft).await
        };

        match result {
            Ok(outcome) => {
                list.refresh().await;
                self.message = if outcome.is_partial() {
                    Some(
                        outcome
                            .warnings
                            .iter()
                            .map(|w| w.message.as_str())
                            .collect::<Vec<_>>()
                            .join(" "),
                    )
                } else {
                    None
                };
                self.draft = VideoDraft::default();
                self.mode = FormMode::Closed;
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!("Video save failed: {}", e);
                self.message = Some(e.message());
                Err(SubmitError::Primary(e))
            }
        }
    }
}
