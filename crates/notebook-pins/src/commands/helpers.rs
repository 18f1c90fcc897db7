use crate::error::Result;
use crate::model::{now_millis, PinsState};
use crate::notes::{NoteEntity, NotesAdapter};
use crate::store::PinsRepository;
use tracing::debug;

/// Re-sanitizes the in-memory state, stamps it and hands it to the repository.
pub fn persist<R: PinsRepository>(state: &mut PinsState, repo: &R) -> Result<()> {
    *state = state.sanitized();
    state.updated_at = now_millis();
    repo.save_state(state)
}

/// Looks a note up, folding adapter failures into "not found".
pub fn lookup_note<N: NotesAdapter>(notes: &N, note_id: &str) -> Option<NoteEntity> {
    match notes.get_note(note_id) {
        Ok(note) => note,
        Err(err) => {
            debug!(note_id, "note lookup failed, treating as missing: {err}");
            None
        }
    }
}
