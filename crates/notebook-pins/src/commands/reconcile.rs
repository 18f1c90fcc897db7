//! Reconciliation of the pin index against live note data.
//!
//! The index is allowed to drift: notes get trashed, deleted or moved in the host
//! while nobody is looking at their folder. Instead of tracking every change, drift is
//! resolved lazily at three points:
//!
//! 1. **Listing** ([`list`]): every pin of the folder being displayed is checked.
//! 2. **Change notification** ([`note_changed`]): the single note that changed.
//! 3. **Sweep** ([`sweep`]): every pin in the index, before a view is presented.
//!
//! Each pin is classified the same way in all three:
//!
//! | Live note data | Result |
//! |----------------|--------|
//! | missing, lookup error, trashed, no parent | **stale**: remove |
//! | parent differs, auto-migrate on | **moved**: follow the note |
//! | parent differs, auto-migrate off | **stale**: remove |
//! | parent matches | **in place**: keep |
//!
//! Changes found in one pass are persisted once at the end.

use crate::error::Result;
use crate::model::{PinnedNote, PinsState, UNTITLED};
use crate::notes::{NoteEntity, NotesAdapter};
use crate::store::PinsRepository;
use tracing::{debug, info};

use super::helpers::{lookup_note, persist};
use super::ReconcileReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinStatus {
    Stale,
    Moved { to: String },
    InPlace(NoteEntity),
}

pub fn classify(note: Option<NoteEntity>, folder_id: &str) -> PinStatus {
    let Some(note) = note else {
        return PinStatus::Stale;
    };
    let Some(parent) = note.live_folder().map(str::to_string) else {
        return PinStatus::Stale;
    };
    if parent == folder_id {
        PinStatus::InPlace(note)
    } else {
        PinStatus::Moved { to: parent }
    }
}

/// Resolves the pins of `folder_id` for display, dropping or migrating drifted ones.
///
/// The returned notes are the in-place pins, in stored order.
pub fn list<R: PinsRepository, N: NotesAdapter>(
    state: &mut PinsState,
    repo: &R,
    notes: &N,
    folder_id: &str,
) -> Result<Vec<PinnedNote>> {
    let note_ids = state.pinned_ids(folder_id);
    if note_ids.is_empty() {
        return Ok(Vec::new());
    }

    let auto_migrate = repo.auto_migrate_on_move()?;
    let mut listed = Vec::new();
    let mut stale = Vec::new();
    let mut migrations = Vec::new();

    for note_id in note_ids {
        match classify(lookup_note(notes, &note_id), folder_id) {
            PinStatus::InPlace(note) => listed.push(to_pinned_note(note_id, &note)),
            PinStatus::Moved { to } if auto_migrate => migrations.push((note_id, to)),
            PinStatus::Moved { .. } | PinStatus::Stale => stale.push(note_id),
        }
    }

    let mut report = ReconcileReport::default();
    for note_id in &stale {
        if state.remove_pin(note_id, folder_id) {
            debug!(note_id = note_id.as_str(), folder_id, "dropped stale pin");
            report.removed += 1;
        }
    }
    for (note_id, to) in &migrations {
        if state.move_pin(note_id, folder_id, to) {
            info!(
                note_id = note_id.as_str(),
                from = folder_id,
                to = to.as_str(),
                "migrated pin"
            );
            report.migrated += 1;
        }
    }

    if report.changed() {
        persist(state, repo)?;
    }

    Ok(listed)
}

/// Re-checks a single note after the host reported a change to it.
///
/// Returns whether the index changed.
pub fn note_changed<R: PinsRepository, N: NotesAdapter>(
    state: &mut PinsState,
    repo: &R,
    notes: &N,
    note_id: &str,
) -> Result<bool> {
    let Some(folder_id) = state.folder_of(note_id).map(str::to_string) else {
        return Ok(false);
    };

    let changed = match classify(lookup_note(notes, note_id), &folder_id) {
        PinStatus::InPlace(_) => false,
        PinStatus::Stale => state.remove_pin(note_id, &folder_id),
        PinStatus::Moved { to } => {
            if repo.auto_migrate_on_move()? {
                state.move_pin(note_id, &folder_id, &to)
            } else {
                state.remove_pin(note_id, &folder_id)
            }
        }
    };

    if changed {
        debug!(note_id, folder_id = folder_id.as_str(), "reconciled changed note");
        persist(state, repo)?;
    }
    Ok(changed)
}

/// Checks every pin in the index against live note data.
pub fn sweep<R: PinsRepository, N: NotesAdapter>(
    state: &mut PinsState,
    repo: &R,
    notes: &N,
) -> Result<ReconcileReport> {
    let entries = state.indexed_pins();
    let mut report = ReconcileReport::default();
    if entries.is_empty() {
        return Ok(report);
    }

    let auto_migrate = repo.auto_migrate_on_move()?;

    for (note_id, folder_id) in entries {
        match classify(lookup_note(notes, &note_id), &folder_id) {
            PinStatus::InPlace(_) => {}
            PinStatus::Moved { to } if auto_migrate => {
                if state.move_pin(&note_id, &folder_id, &to) {
                    report.migrated += 1;
                }
            }
            PinStatus::Moved { .. } | PinStatus::Stale => {
                if state.remove_pin(&note_id, &folder_id) {
                    report.removed += 1;
                }
            }
        }
    }

    if report.changed() {
        info!(
            removed = report.removed,
            migrated = report.migrated,
            "reconciled pin index"
        );
        persist(state, repo)?;
    }

    Ok(report)
}

fn to_pinned_note(note_id: String, note: &NoteEntity) -> PinnedNote {
    let title = note
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(UNTITLED)
        .to_string();

    PinnedNote {
        note_id,
        title,
        is_todo: note.is_todo(),
        todo_completed: note.todo_completed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::pinning::pin;
    use crate::notes::memory::InMemoryNotes;
    use crate::store::memory::fixtures::RepoFixture;

    fn pinned(fixture: &RepoFixture, pins: &[(&str, &str)]) -> PinsState {
        let mut state = PinsState::empty();
        for (note, folder) in pins {
            pin(&mut state, &fixture.repo, note, folder).unwrap();
        }
        state
    }

    #[test]
    fn classify_outcomes() {
        assert_eq!(classify(None, "f1"), PinStatus::Stale);

        let trashed = NoteEntity::new("n1", "f1").with_deleted_time(9);
        assert_eq!(classify(Some(trashed), "f1"), PinStatus::Stale);

        let orphan = NoteEntity::new("n1", "");
        assert_eq!(classify(Some(orphan), "f1"), PinStatus::Stale);

        let moved = NoteEntity::new("n1", "f2");
        assert_eq!(
            classify(Some(moved), "f1"),
            PinStatus::Moved { to: "f2".into() }
        );

        let here = NoteEntity::new("n1", "f1");
        assert!(matches!(classify(Some(here), "f1"), PinStatus::InPlace(_)));
    }

    #[test]
    fn list_returns_display_fields_in_order() {
        let fixture = RepoFixture::new();
        let mut state = pinned(&fixture, &[("n2", "f1"), ("n1", "f1")]);
        let notes = InMemoryNotes::new()
            .with_note(NoteEntity::new("n1", "f1").with_title("First"))
            .with_note(NoteEntity::new("n2", "f1").with_title("  ").with_todo(true));

        let listed = list(&mut state, &fixture.repo, &notes, "f1").unwrap();
        assert_eq!(
            listed,
            vec![
                PinnedNote {
                    note_id: "n2".into(),
                    title: UNTITLED.into(),
                    is_todo: true,
                    todo_completed: true,
                },
                PinnedNote {
                    note_id: "n1".into(),
                    title: "First".into(),
                    is_todo: false,
                    todo_completed: false,
                },
            ]
        );
    }

    #[test]
    fn list_purges_missing_trashed_and_failing_notes() {
        let fixture = RepoFixture::new();
        let mut state = pinned(
            &fixture,
            &[("gone", "f1"), ("trashed", "f1"), ("broken", "f1"), ("ok", "f1")],
        );
        let notes = InMemoryNotes::new()
            .with_note(NoteEntity::new("trashed", "f1").with_deleted_time(1))
            .with_note(NoteEntity::new("broken", "f1"))
            .with_note(NoteEntity::new("ok", "f1"));
        notes.fail_lookup("broken");

        let listed = list(&mut state, &fixture.repo, &notes, "f1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].note_id, "ok");
        assert_eq!(state.pinned_ids("f1"), vec!["ok"]);
        assert_eq!(fixture.repo.load_state().unwrap().pinned_ids("f1"), vec!["ok"]);
    }

    #[test]
    fn list_drops_moved_note_without_auto_migrate() {
        let fixture = RepoFixture::new().with_auto_migrate(false);
        let mut state = pinned(&fixture, &[("n1", "f1")]);
        let notes = InMemoryNotes::new().with_note(NoteEntity::new("n1", "f2"));

        let listed = list(&mut state, &fixture.repo, &notes, "f1").unwrap();
        assert!(listed.is_empty());
        assert!(state.pinned_ids("f1").is_empty());
        assert!(state.pinned_ids("f2").is_empty());
        assert_eq!(state.folder_of("n1"), None);
    }

    #[test]
    fn list_migrates_moved_note_with_auto_migrate() {
        let fixture = RepoFixture::new().with_auto_migrate(true);
        let mut state = pinned(&fixture, &[("n1", "f1"), ("n2", "f2")]);
        let notes = InMemoryNotes::new().with_note(NoteEntity::new("n1", "f2"));

        let listed = list(&mut state, &fixture.repo, &notes, "f1").unwrap();
        assert!(listed.is_empty());
        assert!(state.pinned_ids("f1").is_empty());
        assert_eq!(state.pinned_ids("f2"), vec!["n2", "n1"]);
        assert_eq!(state.folder_of("n1"), Some("f2"));
    }

    #[test]
    fn list_without_drift_does_not_persist() {
        let fixture = RepoFixture::new();
        let mut state = pinned(&fixture, &[("n1", "f1")]);
        let notes = InMemoryNotes::new().with_note(NoteEntity::new("n1", "f1"));
        let writes = fixture.repo.backend().write_count();

        list(&mut state, &fixture.repo, &notes, "f1").unwrap();
        assert_eq!(fixture.repo.backend().write_count(), writes);
    }

    #[test]
    fn list_persists_batch_once() {
        let fixture = RepoFixture::new();
        let mut state = pinned(&fixture, &[("a", "f1"), ("b", "f1"), ("c", "f1")]);
        let writes = fixture.repo.backend().write_count();

        list(&mut state, &fixture.repo, &InMemoryNotes::new(), "f1").unwrap();
        assert!(state.is_empty());
        assert_eq!(fixture.repo.backend().write_count(), writes + 1);
    }

    #[test]
    fn note_changed_ignores_unpinned_notes() {
        let fixture = RepoFixture::new();
        let mut state = PinsState::empty();
        let notes = InMemoryNotes::new();
        assert!(!note_changed(&mut state, &fixture.repo, &notes, "n1").unwrap());
    }

    #[test]
    fn note_changed_handles_each_outcome() {
        let fixture = RepoFixture::new().with_auto_migrate(true);
        let mut state = pinned(&fixture, &[("here", "f1"), ("moved", "f1"), ("gone", "f1")]);
        let notes = InMemoryNotes::new()
            .with_note(NoteEntity::new("here", "f1"))
            .with_note(NoteEntity::new("moved", "f3"));

        assert!(!note_changed(&mut state, &fixture.repo, &notes, "here").unwrap());
        assert!(note_changed(&mut state, &fixture.repo, &notes, "moved").unwrap());
        assert!(note_changed(&mut state, &fixture.repo, &notes, "gone").unwrap());

        assert_eq!(state.pinned_ids("f1"), vec!["here"]);
        assert_eq!(state.pinned_ids("f3"), vec!["moved"]);
        assert_eq!(state.folder_of("gone"), None);
    }

    #[test]
    fn note_changed_removes_moved_note_without_auto_migrate() {
        let fixture = RepoFixture::new();
        let mut state = pinned(&fixture, &[("n1", "f1")]);
        let notes = InMemoryNotes::new().with_note(NoteEntity::new("n1", "f2"));

        assert!(note_changed(&mut state, &fixture.repo, &notes, "n1").unwrap());
        assert!(state.is_empty());
    }

    #[test]
    fn sweep_covers_every_folder() {
        let fixture = RepoFixture::new().with_auto_migrate(true);
        let mut state = pinned(
            &fixture,
            &[("a", "f1"), ("b", "f2"), ("c", "f3"), ("d", "f3")],
        );
        let notes = InMemoryNotes::new()
            .with_note(NoteEntity::new("a", "f1"))
            .with_note(NoteEntity::new("b", "f1"))
            .with_note(NoteEntity::new("d", "f3").with_deleted_time(3));

        let report = sweep(&mut state, &fixture.repo, &notes).unwrap();
        assert_eq!(report, ReconcileReport { removed: 2, migrated: 1 });
        assert_eq!(state.pinned_ids("f1"), vec!["a", "b"]);
        assert!(state.pinned_ids("f2").is_empty());
        assert!(state.pinned_ids("f3").is_empty());
        let stored = fixture.repo.load_state().unwrap();
        assert_eq!(stored.pins_by_folder_id, state.pins_by_folder_id);
        assert_eq!(stored.note_to_folder_index, state.note_to_folder_index);
    }

    #[test]
    fn sweep_on_empty_index_skips_repository() {
        let fixture = RepoFixture::new();
        let mut state = PinsState::empty();
        let report = sweep(&mut state, &fixture.repo, &InMemoryNotes::new()).unwrap();
        assert!(!report.changed());
        assert_eq!(fixture.repo.backend().write_count(), 0);
    }
}
