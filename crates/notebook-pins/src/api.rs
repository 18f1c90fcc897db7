//! # API Facade
//!
//! [`PinsService`] is the single entry point for pin operations. It owns the in-memory
//! [`PinsState`] and the two collaborators, and dispatches every call to the command
//! layer.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Owns state**: the index is private; callers get copies ([`PinsService::get_pinned_ids`],
//!   [`PinsService::get_state_snapshot`]), never references into it
//! - **Dispatches** to `commands::*` with the state and collaborators
//! - **Translates** for the presentation layer: render models, panel actions, workspace
//!   events
//!
//! ## Lifecycle
//!
//! ```text
//! new()  ──▶  init()  ──▶  pin / unpin / reorder / list / reconcile ...
//! empty       load, sanitize, re-save
//! ```
//!
//! ## Generic Over Collaborators
//!
//! `PinsService<R: PinsRepository, N: NotesAdapter>`:
//! - Production: a host-backed adapter and `FileRepository` (or a host settings backend)
//! - Testing: `InMemoryRepository` and `InMemoryNotes`
//!
//! ## Execution Model
//!
//! Single-threaded. Mutating operations take `&mut self`, so two operations can never
//! interleave on the same index. Collaborator calls are the only external boundaries.

use crate::commands::{self, PinResult, ReconcileReport};
use crate::error::Result;
use crate::events::{Refresh, WorkspaceEvent};
use crate::model::{FolderRef, PinnedNote, PinsState, Selection};
use crate::notes::NotesAdapter;
use crate::panel::{PanelAction, PanelRenderModel};
use crate::store::PinsRepository;
use tracing::warn;

/// Owns the pin index and runs every operation on it.
pub struct PinsService<R: PinsRepository, N: NotesAdapter> {
    state: PinsState,
    repository: R,
    notes: N,
}

impl<R: PinsRepository, N: NotesAdapter> PinsService<R, N> {
    /// Creates a service with an empty index. Call [`PinsService::init`] to load.
    pub fn new(repository: R, notes: N) -> Self {
        Self {
            state: PinsState::empty(),
            repository,
            notes,
        }
    }

    /// Loads the stored index, re-sanitizes it and writes the clean copy back.
    pub fn init(&mut self) -> Result<()> {
        self.state = self.repository.load_state()?.sanitized();
        self.repository.save_state(&self.state)
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn notes(&self) -> &N {
        &self.notes
    }

    pub fn get_pinned_ids(&self, folder_id: &str) -> Vec<String> {
        self.state.pinned_ids(folder_id)
    }

    pub fn get_state_snapshot(&self) -> PinsState {
        self.state.clone()
    }

    pub fn pin_note(&mut self, note_id: &str, folder_id: &str) -> Result<PinResult> {
        commands::pinning::pin(&mut self.state, &self.repository, note_id, folder_id)
    }

    pub fn unpin_note(&mut self, note_id: &str, folder_id: &str) -> Result<PinResult> {
        commands::pinning::unpin(&mut self.state, &self.repository, note_id, folder_id)
    }

    pub fn pin_selected(&mut self, selection: &Selection) -> Result<PinResult> {
        commands::pinning::pin_selected(
            &mut self.state,
            &self.repository,
            &self.notes,
            selection,
        )
    }

    pub fn unpin_selected(&mut self, selection: &Selection) -> Result<PinResult> {
        commands::pinning::unpin_selected(&mut self.state, &self.repository, selection)
    }

    pub fn reorder_pins(&mut self, folder_id: &str, requested: &[String]) -> Result<PinResult> {
        commands::reorder::run(&mut self.state, &self.repository, folder_id, requested)
    }

    pub fn list_pinned_notes(&mut self, folder_id: &str) -> Result<Vec<PinnedNote>> {
        commands::reconcile::list(&mut self.state, &self.repository, &self.notes, folder_id)
    }

    pub fn handle_note_change(&mut self, note_id: &str) -> Result<()> {
        commands::reconcile::note_changed(
            &mut self.state,
            &self.repository,
            &self.notes,
            note_id,
        )?;
        Ok(())
    }

    pub fn reconcile_pins(&mut self) -> Result<ReconcileReport> {
        commands::reconcile::sweep(&mut self.state, &self.repository, &self.notes)
    }

    pub fn open_pinned_note(&self, note_id: &str) -> Result<()> {
        self.notes.open_note(note_id)
    }

    /// Builds the panel model for the selected folder.
    ///
    /// Runs a full reconciliation sweep first. Failures are rendered into the model
    /// rather than returned.
    pub fn render_model(&mut self, folder: Option<&FolderRef>) -> PanelRenderModel {
        let Some(folder) = folder else {
            return PanelRenderModel::no_folder();
        };

        match self
            .reconcile_pins()
            .and_then(|_| self.list_pinned_notes(&folder.id))
        {
            Ok(pins) => PanelRenderModel::for_folder(folder, pins),
            Err(err) => {
                warn!(folder_id = folder.id.as_str(), "failed to render pins: {err}");
                PanelRenderModel::unavailable(err.to_string())
            }
        }
    }

    /// Carries out an action sent by the panel.
    pub fn apply_action(&mut self, action: PanelAction) -> Result<PinResult> {
        match action {
            PanelAction::OpenNote { note_id } => {
                self.open_pinned_note(&note_id)?;
                Ok(PinResult::unchanged())
            }
            PanelAction::UnpinNote { note_id, folder_id } => self.unpin_note(&note_id, &folder_id),
            PanelAction::ReorderPins {
                folder_id,
                ordered_note_ids,
            } => self.reorder_pins(&folder_id, &ordered_note_ids),
        }
    }

    /// Reacts to a host workspace event and tells the caller how to refresh.
    pub fn handle_event(&mut self, event: WorkspaceEvent) -> Result<Refresh> {
        if let WorkspaceEvent::NoteChanged { note_id } = &event {
            self.handle_note_change(note_id)?;
        }
        Ok(event.refresh())
    }
}
