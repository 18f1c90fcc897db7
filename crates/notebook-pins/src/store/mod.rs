//! # Storage Layer
//!
//! This module defines the persistence abstraction for the pin index. The
//! [`PinsRepository`] trait is what the service talks to; it knows how to load and save
//! a [`PinsState`] and how to read the two settings that shape pin behavior.
//!
//! ## Layering
//!
//! ```text
//! PinsService ──▶ PinsRepository            (what: decode state, normalize settings)
//!                      │
//!                      ▼
//!                 SettingsBackend           (how: key/value I/O)
//!                  ├─ MemBackend            (tests, embedding)
//!                  └─ FsBackend             (settings.json on disk)
//! ```
//!
//! [`repository::SettingsRepository`] is the single `PinsRepository` implementation
//! and works over any backend.
//!
//! ## Persistence Model
//!
//! - The whole index is one JSON-encoded string under `notebookPins.state`.
//! - Every save re-sanitizes the state and stamps `updatedAt`.
//! - Saves are last-write-wins. There is no concurrency token.
//! - Loading never fails on bad data; corrupt or foreign blobs load as an empty state.
//!   Only backend I/O errors surface.
//!
//! ## Implementations
//!
//! - [`memory::InMemoryRepository`]: For testing logic without filesystem I/O.
//! - [`repository::FileRepository`]: Settings kept in a JSON file.

use crate::error::Result;
use crate::model::PinsState;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod repository;

/// Abstract interface for pin state persistence and pin-related settings.
pub trait PinsRepository {
    /// Load the stored state. Unrecognized data yields an empty state.
    fn load_state(&self) -> Result<PinsState>;

    /// Persist the state. Implementations sanitize and stamp `updated_at` first.
    fn save_state(&self, state: &PinsState) -> Result<()>;

    /// Capacity per folder. 0 means unlimited.
    fn max_pins(&self) -> Result<u32>;

    /// Whether pins follow their note when it moves to another folder.
    fn auto_migrate_on_move(&self) -> Result<bool>;
}
