//! # Pin Index Primitives
//!
//! The pin index is a bidirectional mapping held in [`PinsState`]:
//!
//! ```text
//! pins_by_folder_id      folder -> [note, note, ...]   (ordered, user visible)
//! note_to_folder_index   note   -> folder              (O(1) reverse lookup)
//! ```
//!
//! Every mutation in this crate goes through the handful of primitives below, which
//! always touch both sides together. Persisting additionally runs
//! [`PinsState::sanitized`], which rebuilds the reverse side from scratch, so any drift
//! between the two halves cannot survive a save.
//!
//! Queries hand out owned copies. Nothing outside the crate gets a mutable reference
//! into the index.

use crate::model::{is_valid_id, PinsState};

impl PinsState {
    /// The folder order for `folder_id`, or an empty list.
    pub fn pinned_ids(&self, folder_id: &str) -> Vec<String> {
        self.pins_by_folder_id
            .get(folder_id)
            .cloned()
            .unwrap_or_default()
    }

    /// The folder `note_id` is currently pinned in, if any.
    pub fn folder_of(&self, note_id: &str) -> Option<&str> {
        self.note_to_folder_index.get(note_id).map(String::as_str)
    }

    pub fn pin_count(&self, folder_id: &str) -> usize {
        self.pins_by_folder_id.get(folder_id).map_or(0, Vec::len)
    }

    /// Every `(note, folder)` pair in the reverse index, in note id order.
    pub fn indexed_pins(&self) -> Vec<(String, String)> {
        self.note_to_folder_index
            .iter()
            .map(|(note, folder)| (note.clone(), folder.clone()))
            .collect()
    }

    /// Appends `note_id` to the end of the folder's list.
    ///
    /// Callers must have removed any pin the note holds elsewhere first.
    pub(crate) fn append_pin(&mut self, note_id: &str, folder_id: &str) {
        let pins = self
            .pins_by_folder_id
            .entry(folder_id.to_string())
            .or_default();
        if !pins.iter().any(|id| id == note_id) {
            pins.push(note_id.to_string());
        }
        self.note_to_folder_index
            .insert(note_id.to_string(), folder_id.to_string());
    }

    /// Drops `note_id` from `folder_id`. Returns whether anything was removed.
    ///
    /// The folder key disappears with its last pin. The reverse entry is cleared only
    /// while it still points at `folder_id`.
    pub(crate) fn remove_pin(&mut self, note_id: &str, folder_id: &str) -> bool {
        let Some(pins) = self.pins_by_folder_id.get_mut(folder_id) else {
            return false;
        };

        let before = pins.len();
        pins.retain(|id| id != note_id);
        if pins.len() == before {
            return false;
        }

        if pins.is_empty() {
            self.pins_by_folder_id.remove(folder_id);
        }

        if self.folder_of(note_id) == Some(folder_id) {
            self.note_to_folder_index.remove(note_id);
        }

        true
    }

    /// Moves a pin from `from` to the end of `to`. Returns whether anything changed.
    pub(crate) fn move_pin(&mut self, note_id: &str, from: &str, to: &str) -> bool {
        if !is_valid_id(to) || from == to {
            return false;
        }
        if !self.remove_pin(note_id, from) {
            return false;
        }
        self.append_pin(note_id, to);
        true
    }

    /// Replaces the folder's order. The caller validates that `order` is a permutation.
    pub(crate) fn replace_order(&mut self, folder_id: &str, order: Vec<String>) {
        if let Some(pins) = self.pins_by_folder_id.get_mut(folder_id) {
            *pins = order;
        }
    }
}
