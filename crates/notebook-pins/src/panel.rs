//! # Panel Contract
//!
//! The pins panel is rendered by the host (a webview strip above the note list). This
//! module defines only what crosses that boundary:
//!
//! - **Outbound**: [`PanelRenderModel`], the data the panel needs to draw itself.
//! - **Inbound**: [`PanelAction`], messages the panel posts back when the user clicks,
//!   unpins or drags chips around.
//!
//! Inbound messages come from a webview and are untrusted. [`PanelAction::parse`]
//! accepts either a JSON value or a JSON-encoded string, and anything that doesn't
//! match one of the known shapes is discarded.
//!
//! ## Wire Shapes
//!
//! ```text
//! { "type": "OPEN_NOTE",    "noteId": "..." }
//! { "type": "UNPIN_NOTE",   "noteId": "...", "folderId": "..." }
//! { "type": "REORDER_PINS", "folderId": "...", "orderedNoteIds": ["...", "..."] }
//! ```
//!
//! The short tags `OPEN`, `UNPIN`, `REORDER` and the field name `noteIdsInOrder` are
//! accepted as well.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{is_valid_id, FolderRef, PinnedNote};

pub const DEFAULT_TITLE: &str = "Pinned notes";
pub const NO_FOLDER_MESSAGE: &str = "Select a notebook to view pinned notes.";
pub const EMPTY_FOLDER_MESSAGE: &str = "Right-click a note -> Pin in this notebook.";
pub const UNAVAILABLE_MESSAGE: &str = "Unable to render pinned notes right now.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PanelCapabilities {
    pub reorder: bool,
}

/// Everything the panel needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelRenderModel {
    pub folder_id: Option<String>,
    pub folder_name: Option<String>,
    pub title: String,
    pub empty_message: String,
    pub pins: Vec<PinnedNote>,
    pub capabilities: PanelCapabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PanelRenderModel {
    /// Nothing selected in the host.
    pub fn no_folder() -> Self {
        Self {
            folder_id: None,
            folder_name: None,
            title: DEFAULT_TITLE.to_string(),
            empty_message: NO_FOLDER_MESSAGE.to_string(),
            pins: Vec::new(),
            capabilities: PanelCapabilities::default(),
            error: None,
        }
    }

    pub fn for_folder(folder: &FolderRef, pins: Vec<PinnedNote>) -> Self {
        Self {
            folder_id: Some(folder.id.clone()),
            folder_name: Some(folder.title.clone()),
            title: format!("Pinned in \"{}\"", folder.title),
            empty_message: EMPTY_FOLDER_MESSAGE.to_string(),
            capabilities: PanelCapabilities {
                reorder: pins.len() > 1,
            },
            pins,
            error: None,
        }
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            empty_message: UNAVAILABLE_MESSAGE.to_string(),
            error: Some(error.into()),
            ..Self::no_folder()
        }
    }
}

/// A user action posted by the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PanelAction {
    #[serde(rename = "OPEN_NOTE", alias = "OPEN", rename_all = "camelCase")]
    OpenNote { note_id: String },

    #[serde(rename = "UNPIN_NOTE", alias = "UNPIN", rename_all = "camelCase")]
    UnpinNote { note_id: String, folder_id: String },

    #[serde(rename = "REORDER_PINS", alias = "REORDER", rename_all = "camelCase")]
    ReorderPins {
        folder_id: String,
        #[serde(alias = "noteIdsInOrder")]
        ordered_note_ids: Vec<String>,
    },
}

impl PanelAction {
    /// Parses an untrusted panel message. Returns `None` for anything malformed.
    pub fn parse(message: &Value) -> Option<Self> {
        let action = match message {
            Value::String(text) => serde_json::from_str::<Self>(text).ok()?,
            other => Self::deserialize(other).ok()?,
        };
        action.is_well_formed().then_some(action)
    }

    fn is_well_formed(&self) -> bool {
        match self {
            Self::OpenNote { note_id } => is_valid_id(note_id),
            Self::UnpinNote { note_id, folder_id } => {
                is_valid_id(note_id) && is_valid_id(folder_id)
            }
            Self::ReorderPins { folder_id, .. } => is_valid_id(folder_id),
        }
    }
}
