//! # Domain Model: Pin State and Sanitization
//!
//! This module defines the persisted shape of the pin index, [`PinsState`], and the
//! rules that turn arbitrary input into a valid instance of it.
//!
//! ## The Problem
//!
//! The pin index is stored as a single JSON blob in the host's settings. That blob is
//! untrusted: it may be empty, truncated, hand-edited, written by an older build, or
//! written by something that isn't us at all. Loading must never fail because of it.
//!
//! ## The Shape
//!
//! ```text
//! {
//!   "version": 1,
//!   "pinsByFolderId":    { "folder-a": ["note-1", "note-2"] },   <-- truth, ordered
//!   "noteToFolderIndex": { "note-1": "folder-a", "note-2": "folder-a" },  <-- derived
//!   "updatedAt": 1735689600000
//! }
//! ```
//!
//! `pinsByFolderId` is the only field that drives reconstruction. The reverse index is
//! rebuilt from it every time the state is sanitized and is never read from input.
//!
//! ## Invariants
//!
//! After sanitization:
//! 1. A note id appears in at most one folder list.
//! 2. `noteToFolderIndex[n] == f` exactly when `n` is in `pinsByFolderId[f]`.
//! 3. No folder maps to an empty list.
//! 4. Folder and note ids are non-blank strings.
//! 5. No folder list holds duplicates.
//!
//! ## First Claim Wins
//!
//! When the same note is listed under several folders, the first folder to claim it
//! keeps it and later claims are dropped. Folders are walked in lexicographic order of
//! their ids, so the winner does not depend on how the input happened to be encoded.
//!
//! ## Schema Recognition
//!
//! [`parse_stored_state`] only sanitizes values that look like pin data: the version
//! matches [`STATE_VERSION`], or a `pinsByFolderId` key is present. Everything else
//! (corrupt JSON, foreign objects, scalars) yields an empty state.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

pub const STATE_VERSION: u32 = 1;

/// Title shown for pinned notes whose title is blank.
pub const UNTITLED: &str = "(Untitled)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinsState {
    pub version: u32,
    pub pins_by_folder_id: BTreeMap<String, Vec<String>>,
    pub note_to_folder_index: BTreeMap<String, String>,
    /// Milliseconds since the Unix epoch of the last persist.
    pub updated_at: i64,
}

impl Default for PinsState {
    fn default() -> Self {
        Self::empty()
    }
}

impl PinsState {
    pub fn empty() -> Self {
        Self::empty_at(now_millis())
    }

    pub fn empty_at(updated_at: i64) -> Self {
        Self {
            version: STATE_VERSION,
            pins_by_folder_id: BTreeMap::new(),
            note_to_folder_index: BTreeMap::new(),
            updated_at,
        }
    }

    /// Returns a copy of this state with every invariant re-established.
    ///
    /// Applies the same rules as [`sanitize_value`]; the reverse index is rebuilt from
    /// `pins_by_folder_id` and `updated_at` is kept as is.
    pub fn sanitized(&self) -> Self {
        let mut builder = StateBuilder::default();
        for (folder_id, note_ids) in &self.pins_by_folder_id {
            builder.claim(folder_id, note_ids.iter().map(String::as_str));
        }
        builder.finish(self.updated_at)
    }

    pub fn is_empty(&self) -> bool {
        self.note_to_folder_index.is_empty()
    }
}

/// A pinned note resolved against live note data, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedNote {
    pub note_id: String,
    pub title: String,
    pub is_todo: bool,
    pub todo_completed: bool,
}

/// A folder as the host reports it, e.g. the currently selected notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    pub id: String,
    pub title: String,
}

impl FolderRef {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// The host's current selection: the focused notebook and the primary selected note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub folder: Option<FolderRef>,
    pub note_id: Option<String>,
}

impl Selection {
    pub fn new(folder: FolderRef, note_id: impl Into<String>) -> Self {
        Self {
            folder: Some(folder),
            note_id: Some(note_id.into()),
        }
    }
}

/// Normalizes arbitrary input into a valid [`PinsState`]. Never fails.
pub fn sanitize_value(raw: &Value) -> PinsState {
    let mut builder = StateBuilder::default();

    if let Some(pins) = raw.get("pinsByFolderId").and_then(Value::as_object) {
        // Sorted regardless of how serde_json's map is configured.
        let ordered: BTreeMap<&str, &Value> =
            pins.iter().map(|(k, v)| (k.as_str(), v)).collect();

        for (folder_id, candidates) in ordered {
            let Some(candidates) = candidates.as_array() else {
                continue;
            };
            builder.claim(folder_id, candidates.iter().filter_map(Value::as_str));
        }
    }

    let updated_at = raw
        .get("updatedAt")
        .and_then(finite_millis)
        .unwrap_or_else(now_millis);

    builder.finish(updated_at)
}

/// Decodes a stored setting value into a [`PinsState`].
///
/// Accepts either the JSON-encoded string the repository writes or an already
/// decoded value. Blank strings, unparsable JSON and unrecognized shapes all produce
/// an empty state.
pub fn parse_stored_state(raw: &Value) -> PinsState {
    let decoded;
    let candidate = match raw {
        Value::String(text) => {
            if text.trim().is_empty() {
                return PinsState::empty();
            }
            match serde_json::from_str::<Value>(text) {
                Ok(value) => {
                    decoded = value;
                    &decoded
                }
                Err(err) => {
                    warn!("discarding unparsable pin state: {err}");
                    return PinsState::empty();
                }
            }
        }
        other => other,
    };

    let Some(object) = candidate.as_object() else {
        return PinsState::empty();
    };

    let version_matches =
        object.get("version").and_then(Value::as_u64) == Some(u64::from(STATE_VERSION));
    if version_matches || object.contains_key("pinsByFolderId") {
        sanitize_value(candidate)
    } else {
        warn!("discarding pin state with unrecognized schema");
        PinsState::empty()
    }
}

pub(crate) fn is_valid_id(id: &str) -> bool {
    !id.trim().is_empty()
}

pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn finite_millis(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|millis| millis.is_finite())
            .map(|millis| millis as i64)
    })
}

#[derive(Default)]
struct StateBuilder {
    pins: BTreeMap<String, Vec<String>>,
    index: BTreeMap<String, String>,
}

impl StateBuilder {
    fn claim<'a>(&mut self, folder_id: &str, note_ids: impl IntoIterator<Item = &'a str>) {
        if !is_valid_id(folder_id) {
            return;
        }

        let mut cleaned = Vec::new();
        for note_id in note_ids {
            if !is_valid_id(note_id) || self.index.contains_key(note_id) {
                continue;
            }
            self.index
                .insert(note_id.to_string(), folder_id.to_string());
            cleaned.push(note_id.to_string());
        }

        if !cleaned.is_empty() {
            self.pins.insert(folder_id.to_string(), cleaned);
        }
    }

    fn finish(self, updated_at: i64) -> PinsState {
        PinsState {
            version: STATE_VERSION,
            pins_by_folder_id: self.pins,
            note_to_folder_index: self.index,
            updated_at,
        }
    }
}
