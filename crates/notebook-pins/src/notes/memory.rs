use super::{NoteEntity, NotesAdapter};
use crate::error::{PinsError, Result};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// In-memory notes adapter for testing and embedding.
///
/// Notes can be added, moved and removed between service calls to simulate changes
/// made in the host. Lookups for ids registered with [`InMemoryNotes::fail_lookup`]
/// return an error.
#[derive(Default)]
pub struct InMemoryNotes {
    notes: RefCell<BTreeMap<String, NoteEntity>>,
    failing: RefCell<BTreeSet<String>>,
    opened: RefCell<Vec<String>>,
}

impl InMemoryNotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_note(self, note: NoteEntity) -> Self {
        self.insert(note);
        self
    }

    pub fn insert(&self, note: NoteEntity) {
        self.notes.borrow_mut().insert(note.id.clone(), note);
    }

    pub fn remove(&self, note_id: &str) -> Option<NoteEntity> {
        self.notes.borrow_mut().remove(note_id)
    }

    /// Changes the note's parent folder. Returns false if the note is unknown.
    pub fn move_note(&self, note_id: &str, folder_id: &str) -> bool {
        match self.notes.borrow_mut().get_mut(note_id) {
            Some(note) => {
                note.parent_id = Some(folder_id.to_string());
                true
            }
            None => false,
        }
    }

    /// Marks the note as soft-deleted. Returns false if the note is unknown.
    pub fn trash_note(&self, note_id: &str, deleted_time: i64) -> bool {
        match self.notes.borrow_mut().get_mut(note_id) {
            Some(note) => {
                note.deleted_time = Some(deleted_time);
                true
            }
            None => false,
        }
    }

    pub fn fail_lookup(&self, note_id: &str) {
        self.failing.borrow_mut().insert(note_id.to_string());
    }

    /// Ids passed to `open_note`, in call order.
    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl NotesAdapter for InMemoryNotes {
    fn get_note(&self, note_id: &str) -> Result<Option<NoteEntity>> {
        if self.failing.borrow().contains(note_id) {
            return Err(PinsError::Adapter(format!("lookup failed for {}", note_id)));
        }
        Ok(self.notes.borrow().get(note_id).cloned())
    }

    fn open_note(&self, note_id: &str) -> Result<()> {
        self.opened.borrow_mut().push(note_id.to_string());
        Ok(())
    }
}
