//! # Command Layer
//!
//! This module contains the **core business logic** of notebook pins. Each group of
//! operations lives in its own submodule as plain functions over a `&mut PinsState`
//! plus whichever collaborators it needs.
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Validate inputs and report misuse as data ([`PinResult`]), not as errors
//! - Mutate the index only through the primitives in [`crate::index`]
//! - Consult the [`NotesAdapter`](crate::notes::NotesAdapter) to classify pins
//! - Persist through the [`PinsRepository`](crate::store::PinsRepository) when, and only
//!   when, content changed
//!
//! ## What Commands Do NOT Do
//!
//! - **Own state**: the service facade owns the `PinsState` and lends it out
//! - **Render**: display models live in [`crate::panel`]
//! - **Swallow storage errors**: repository failures propagate as `Err`
//!
//! ## Outcomes vs Errors
//!
//! Everything a user can cause (missing ids, full notebook, bad reorder payload) comes
//! back as `Ok(PinResult { changed: false, message: Some(..) })` so a UI can show the
//! message without special-casing error types. `Err` is reserved for failures of the
//! storage backend.
//!
//! ## Command Modules
//!
//! - [`pinning`]: Pin and unpin, directly or from the host's selection
//! - [`reorder`]: Replace a folder's pin order with a permutation
//! - [`reconcile`]: Check pins against live notes (listing, change events, full sweep)
//! - [`helpers`]: Persisting and note lookup shared by the above

use serde::Serialize;

pub mod helpers;
pub mod pinning;
pub mod reconcile;
pub mod reorder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Outcome of a pin mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PinResult {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<CmdMessage>,
}

impl PinResult {
    pub fn changed() -> Self {
        Self {
            changed: true,
            message: None,
        }
    }

    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn with_message(message: CmdMessage) -> Self {
        Self {
            changed: false,
            message: Some(message),
        }
    }

    pub fn message_text(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.content.as_str())
    }
}

/// What a reconciliation pass did to the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Pins dropped because the note is gone, trashed, moved (without auto-migrate)
    /// or unreachable.
    pub removed: usize,
    /// Pins that followed their note into another folder.
    pub migrated: usize,
}

impl ReconcileReport {
    pub fn changed(&self) -> bool {
        self.removed > 0 || self.migrated > 0
    }
}
