use crate::commands::{CmdMessage, PinResult};
use crate::error::Result;
use crate::model::{is_valid_id, PinsState};
use crate::store::PinsRepository;
use std::collections::HashSet;
use tracing::info;

use super::helpers::persist;

pub const MISSING_FOLDER: &str = "Missing notebook context.";
pub const NOTHING_TO_REORDER: &str = "No pinned notes to reorder.";
pub const INVALID_PAYLOAD: &str = "Invalid reorder payload.";

/// Replaces the pin order of `folder_id` with `requested`.
///
/// `requested` must be a permutation of the folder's current pins. Anything else is
/// rejected before the state is touched.
pub fn run<R: PinsRepository>(
    state: &mut PinsState,
    repo: &R,
    folder_id: &str,
    requested: &[String],
) -> Result<PinResult> {
    if !is_valid_id(folder_id) {
        return Ok(PinResult::with_message(CmdMessage::warning(MISSING_FOLDER)));
    }

    let current = state.pinned_ids(folder_id);
    if requested.is_empty() || current.is_empty() {
        return Ok(PinResult::with_message(CmdMessage::warning(
            NOTHING_TO_REORDER,
        )));
    }

    if !is_permutation(&current, requested) {
        return Ok(PinResult::with_message(CmdMessage::warning(INVALID_PAYLOAD)));
    }

    if current == requested {
        return Ok(PinResult::unchanged());
    }

    state.replace_order(folder_id, requested.to_vec());
    persist(state, repo)?;

    info!(folder_id, pins = requested.len(), "reordered pins");
    Ok(PinResult::changed())
}

fn is_permutation(current: &[String], requested: &[String]) -> bool {
    let unique: HashSet<&str> = requested.iter().map(String::as_str).collect();
    if unique.len() != requested.len() || unique.len() != current.len() {
        return false;
    }
    current.iter().all(|id| unique.contains(id.as_str()))
}
