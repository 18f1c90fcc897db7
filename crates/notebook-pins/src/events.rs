//! Host workspace events and how they translate into panel refreshes.
//!
//! The host fires events far more often than the panel needs redrawing (every
//! keystroke in a note is a change event), so most events ask for a debounced refresh.
//! Switching notebooks is the exception: the panel is visibly wrong until it redraws.
//! [`RefreshScheduler`] coalesces the requests for hosts that don't have a timer
//! utility of their own.

use std::time::{Duration, Instant};

pub const REFRESH_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    NoteSelectionChanged,
    FolderSelectionChanged,
    NoteChanged { note_id: String },
    SyncCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Immediate,
    Debounced,
}

impl WorkspaceEvent {
    pub fn refresh(&self) -> Refresh {
        match self {
            Self::FolderSelectionChanged => Refresh::Immediate,
            Self::NoteSelectionChanged | Self::NoteChanged { .. } | Self::SyncCompleted => {
                Refresh::Debounced
            }
        }
    }
}

/// Coalesces refresh requests into at most one pending deadline.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    wait: Duration,
    deadline: Option<Instant>,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(REFRESH_DEBOUNCE)
    }
}

impl RefreshScheduler {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    /// Records a request. A debounced request pushes a pending debounced deadline back;
    /// it never delays an immediate one.
    pub fn request(&mut self, refresh: Refresh, now: Instant) {
        self.deadline = match (refresh, self.deadline) {
            (Refresh::Immediate, _) => Some(now),
            (Refresh::Debounced, Some(pending)) if pending <= now => Some(pending),
            (Refresh::Debounced, _) => Some(now + self.wait),
        };
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true, and clears the request, once its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
