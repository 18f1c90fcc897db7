//! # Notes Adapter
//!
//! The notes and folders themselves live in the host application. The pin index never
//! owns them; it only holds ids and checks them against live data when it needs to.
//! [`NotesAdapter`] is the capability the service is given for that.
//!
//! ## Liveness
//!
//! A note counts as *live* when the lookup returns it and it carries no positive
//! `deleted_time`. A live note with a blank or missing `parent_id` has no valid folder
//! and is treated the same as a missing one.
//!
//! Adapter errors are never propagated out of reconciliation. A failed lookup is
//! indistinguishable from "not found" as far as the pin index is concerned.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::is_valid_id;

pub mod memory;

/// Note metadata as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntity {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub is_todo: Option<i64>,
    #[serde(default)]
    pub todo_completed: Option<i64>,
    #[serde(default)]
    pub deleted_time: Option<i64>,
}

impl NoteEntity {
    pub fn new(id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(parent_id.into()),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_todo(mut self, completed: bool) -> Self {
        self.is_todo = Some(1);
        self.todo_completed = Some(i64::from(completed));
        self
    }

    pub fn with_deleted_time(mut self, deleted_time: i64) -> Self {
        self.deleted_time = Some(deleted_time);
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_time.is_some_and(|t| t > 0)
    }

    /// The folder this note lives in, when it is live and has a usable parent.
    pub fn live_folder(&self) -> Option<&str> {
        if self.is_deleted() {
            return None;
        }
        self.parent_id.as_deref().filter(|p| is_valid_id(p))
    }

    pub fn is_todo(&self) -> bool {
        self.is_todo.is_some_and(|flag| flag != 0)
    }

    pub fn todo_completed(&self) -> bool {
        self.todo_completed.is_some_and(|flag| flag != 0)
    }
}

/// Access to live note data in the host application.
pub trait NotesAdapter {
    /// Look up a note. Ok(None) when it doesn't exist.
    fn get_note(&self, note_id: &str) -> Result<Option<NoteEntity>>;

    /// Navigate the host to the note.
    fn open_note(&self, note_id: &str) -> Result<()>;
}
