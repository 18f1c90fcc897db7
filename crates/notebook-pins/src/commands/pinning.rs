use crate::commands::{CmdMessage, PinResult};
use crate::error::Result;
use crate::model::{is_valid_id, PinsState, Selection};
use crate::notes::NotesAdapter;
use crate::store::PinsRepository;
use tracing::info;

use super::helpers::{lookup_note, persist};

pub const MISSING_CONTEXT: &str = "Missing note or notebook context.";
pub const ALREADY_PINNED: &str = "This note is already pinned in this notebook.";
pub const SELECT_BEFORE_PIN: &str = "Select a note in a notebook before pinning.";
pub const SELECT_BEFORE_UNPIN: &str = "Select a note in a notebook before unpinning.";
pub const NOTE_UNAVAILABLE: &str = "The selected note is not available.";
pub const NOTE_IN_OTHER_FOLDER: &str =
    "You can only pin notes that belong to the current notebook.";

pub fn capacity_message(max_pins: u32) -> String {
    format!("This notebook already has the maximum of {max_pins} pins.")
}

/// Pins `note_id` at the end of `folder_id`, moving it out of any other folder.
pub fn pin<R: PinsRepository>(
    state: &mut PinsState,
    repo: &R,
    note_id: &str,
    folder_id: &str,
) -> Result<PinResult> {
    if !is_valid_id(note_id) || !is_valid_id(folder_id) {
        return Ok(PinResult::with_message(CmdMessage::warning(MISSING_CONTEXT)));
    }

    let previous = state.folder_of(note_id).map(str::to_string);
    if previous.as_deref() == Some(folder_id) {
        return Ok(PinResult::with_message(CmdMessage::info(ALREADY_PINNED)));
    }

    let max_pins = repo.max_pins()?;
    if max_pins > 0 && state.pin_count(folder_id) >= max_pins as usize {
        return Ok(PinResult::with_message(CmdMessage::warning(
            capacity_message(max_pins),
        )));
    }

    if let Some(previous) = &previous {
        state.remove_pin(note_id, previous);
    }
    state.append_pin(note_id, folder_id);
    persist(state, repo)?;

    info!(note_id, folder_id, moved_from = previous.as_deref(), "pinned note");
    Ok(PinResult::changed())
}

/// Removes `note_id` from `folder_id` if it is pinned there.
pub fn unpin<R: PinsRepository>(
    state: &mut PinsState,
    repo: &R,
    note_id: &str,
    folder_id: &str,
) -> Result<PinResult> {
    if !is_valid_id(note_id) || !is_valid_id(folder_id) {
        return Ok(PinResult::with_message(CmdMessage::warning(MISSING_CONTEXT)));
    }

    if !state.remove_pin(note_id, folder_id) {
        return Ok(PinResult::unchanged());
    }
    persist(state, repo)?;

    info!(note_id, folder_id, "unpinned note");
    Ok(PinResult::changed())
}

/// Pins the selected note in the selected notebook.
///
/// Only notes that actually live in the selected notebook can be pinned there.
pub fn pin_selected<R: PinsRepository, N: NotesAdapter>(
    state: &mut PinsState,
    repo: &R,
    notes: &N,
    selection: &Selection,
) -> Result<PinResult> {
    let (Some(folder), Some(note_id)) = (&selection.folder, &selection.note_id) else {
        return Ok(PinResult::with_message(CmdMessage::warning(SELECT_BEFORE_PIN)));
    };

    let Some(note) = lookup_note(notes, note_id) else {
        return Ok(PinResult::with_message(CmdMessage::warning(NOTE_UNAVAILABLE)));
    };

    if note.parent_id.as_deref() != Some(folder.id.as_str()) {
        return Ok(PinResult::with_message(CmdMessage::warning(
            NOTE_IN_OTHER_FOLDER,
        )));
    }

    pin(state, repo, note_id, &folder.id)
}

/// Unpins the selected note from the selected notebook.
pub fn unpin_selected<R: PinsRepository>(
    state: &mut PinsState,
    repo: &R,
    selection: &Selection,
) -> Result<PinResult> {
    let (Some(folder), Some(note_id)) = (&selection.folder, &selection.note_id) else {
        return Ok(PinResult::with_message(CmdMessage::warning(
            SELECT_BEFORE_UNPIN,
        )));
    };

    unpin(state, repo, note_id, &folder.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::FolderRef;
    use crate::notes::memory::InMemoryNotes;
    use crate::notes::NoteEntity;
    use crate::store::memory::fixtures::RepoFixture;
    use crate::store::memory::InMemoryRepository;

    #[test]
    fn pinning_appends_in_order() {
        let repo = InMemoryRepository::new();
        let mut state = PinsState::empty();

        assert!(pin(&mut state, &repo, "n1", "f1").unwrap().changed);
        assert!(pin(&mut state, &repo, "n2", "f1").unwrap().changed);

        assert_eq!(state.pinned_ids("f1"), vec!["n1", "n2"]);
        assert_eq!(repo.load_state().unwrap().pinned_ids("f1"), vec!["n1", "n2"]);
    }

    #[test]
    fn pinning_twice_is_a_noop() {
        let repo = InMemoryRepository::new();
        let mut state = PinsState::empty();
        pin(&mut state, &repo, "n1", "f1").unwrap();
        let writes = repo.backend().write_count();

        let result = pin(&mut state, &repo, "n1", "f1").unwrap();
        assert!(!result.changed);
        assert_eq!(result.message_text(), Some(ALREADY_PINNED));
        assert_eq!(result.message.unwrap().level, MessageLevel::Info);
        assert_eq!(state.pinned_ids("f1"), vec!["n1"]);
        assert_eq!(repo.backend().write_count(), writes);
    }

    #[test]
    fn pinning_elsewhere_moves_the_pin() {
        let repo = InMemoryRepository::new();
        let mut state = PinsState::empty();
        pin(&mut state, &repo, "n1", "f1").unwrap();
        pin(&mut state, &repo, "n2", "f1").unwrap();

        assert!(pin(&mut state, &repo, "n1", "f2").unwrap().changed);

        assert_eq!(state.pinned_ids("f1"), vec!["n2"]);
        assert_eq!(state.pinned_ids("f2"), vec!["n1"]);
        assert_eq!(state.folder_of("n1"), Some("f2"));
    }

    #[test]
    fn pinning_respects_capacity() {
        let fixture = RepoFixture::new().with_max_pins(1);
        let mut state = PinsState::empty();
        pin(&mut state, &fixture.repo, "n1", "f1").unwrap();

        let result = pin(&mut state, &fixture.repo, "n2", "f1").unwrap();
        assert!(!result.changed);
        assert_eq!(result.message_text(), Some(capacity_message(1).as_str()));
        assert_eq!(state.pinned_ids("f1"), vec!["n1"]);
        assert_eq!(state.folder_of("n2"), None);
    }

    #[test]
    fn capacity_rejection_keeps_pin_in_previous_folder() {
        let fixture = RepoFixture::new().with_max_pins(1);
        let mut state = PinsState::empty();
        pin(&mut state, &fixture.repo, "n1", "f1").unwrap();
        pin(&mut state, &fixture.repo, "n2", "f2").unwrap();

        let result = pin(&mut state, &fixture.repo, "n2", "f1").unwrap();
        assert!(!result.changed);
        assert_eq!(state.pinned_ids("f2"), vec!["n2"]);
    }

    #[test]
    fn pinning_rejects_blank_ids() {
        let repo = InMemoryRepository::new();
        let mut state = PinsState::empty();
        for (note, folder) in [("", "f1"), ("n1", ""), ("  ", "f1")] {
            let result = pin(&mut state, &repo, note, folder).unwrap();
            assert!(!result.changed);
            assert_eq!(result.message_text(), Some(MISSING_CONTEXT));
        }
        assert!(state.is_empty());
        assert_eq!(repo.backend().write_count(), 0);
    }

    #[test]
    fn pinning_propagates_storage_failure() {
        let repo = InMemoryRepository::new();
        repo.backend().set_simulate_write_error(true);
        let mut state = PinsState::empty();
        assert!(pin(&mut state, &repo, "n1", "f1").is_err());
    }

    #[test]
    fn unpinning_removes_only_from_given_folder() {
        let repo = InMemoryRepository::new();
        let mut state = PinsState::empty();
        pin(&mut state, &repo, "n1", "f1").unwrap();

        let result = unpin(&mut state, &repo, "n1", "f2").unwrap();
        assert_eq!(result, PinResult::unchanged());
        assert_eq!(state.pinned_ids("f1"), vec!["n1"]);

        assert!(unpin(&mut state, &repo, "n1", "f1").unwrap().changed);
        assert!(state.is_empty());
        assert!(!state.pins_by_folder_id.contains_key("f1"));
    }

    #[test]
    fn unpinning_noop_does_not_persist() {
        let repo = InMemoryRepository::new();
        let mut state = PinsState::empty();
        unpin(&mut state, &repo, "n1", "f1").unwrap();
        assert_eq!(repo.backend().write_count(), 0);
    }

    #[test]
    fn pin_selected_requires_selection() {
        let repo = InMemoryRepository::new();
        let notes = InMemoryNotes::new();
        let mut state = PinsState::empty();

        let result = pin_selected(&mut state, &repo, &notes, &Selection::default()).unwrap();
        assert_eq!(result.message_text(), Some(SELECT_BEFORE_PIN));

        let result = unpin_selected(&mut state, &repo, &Selection::default()).unwrap();
        assert_eq!(result.message_text(), Some(SELECT_BEFORE_UNPIN));
    }

    #[test]
    fn pin_selected_checks_note_location() {
        let repo = InMemoryRepository::new();
        let notes = InMemoryNotes::new().with_note(NoteEntity::new("n1", "f2"));
        let mut state = PinsState::empty();
        let folder = FolderRef::new("f1", "Inbox");

        let result =
            pin_selected(&mut state, &repo, &notes, &Selection::new(folder.clone(), "n9")).unwrap();
        assert_eq!(result.message_text(), Some(NOTE_UNAVAILABLE));

        let result =
            pin_selected(&mut state, &repo, &notes, &Selection::new(folder, "n1")).unwrap();
        assert_eq!(result.message_text(), Some(NOTE_IN_OTHER_FOLDER));
        assert!(state.is_empty());
    }

    #[test]
    fn pin_selected_pins_note_in_current_folder() {
        let repo = InMemoryRepository::new();
        let notes = InMemoryNotes::new().with_note(NoteEntity::new("n1", "f1"));
        let mut state = PinsState::empty();
        let selection = Selection::new(FolderRef::new("f1", "Inbox"), "n1");

        assert!(pin_selected(&mut state, &repo, &notes, &selection).unwrap().changed);
        assert_eq!(state.pinned_ids("f1"), vec!["n1"]);

        assert!(unpin_selected(&mut state, &repo, &selection).unwrap().changed);
        assert!(state.pinned_ids("f1").is_empty());
    }
}
