//! # Notebook Pins
//!
//! Notebook Pins keeps a small, ordered list of pinned notes per notebook (folder) for a
//! note-taking host. The host owns the notes; this crate owns only the pin index and
//! reconciles it lazily against whatever the host reports about its notes.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Presentation contract (panel.rs, events.rs)                │
//! │  - Render model for the pins panel, inbound panel actions   │
//! │  - Host workspace events and refresh policy                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - PinsService: owns the in-memory index                    │
//! │  - Dispatches to commands with its collaborators            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pin, unpin, reorder, list and reconcile logic            │
//! │  - User misuse is reported as data, never as an error       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)          Notes Layer (notes/)       │
//! │  - PinsRepository over a         - NotesAdapter trait       │
//! │    key/value SettingsBackend     - InMemoryNotes (testing)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Index
//!
//! The persisted state holds the folder → ordered pins map plus a reverse note → folder
//! map. A note is pinned in at most one folder. Every write goes through
//! [`model::PinsState::sanitized`], which rebuilds the reverse map from scratch, so the
//! two can never drift apart on disk. See `model.rs` and `index.rs`.
//!
//! ## Error Model
//!
//! - `Err(PinsError)` means storage failed. The in-memory index may be ahead of what
//!   was written.
//! - Rejected requests (blank ids, capacity reached, bad reorder payload) come back as
//!   `Ok(PinResult)` with `changed == false` and a message for the user.
//! - Note lookup failures are treated as "note missing".
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and installs no subscriber; that is up to the host.
//!
//! ## Module Overview
//!
//! - [`api`]: `PinsService`, the entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`model`]: Persisted state, sanitizer and shared types
//! - [`index`]: Queries and primitive mutations on the pin index
//! - [`store`]: Settings backends and the pins repository
//! - [`notes`]: The host notes collaborator
//! - [`config`]: Setting keys, defaults and normalization
//! - [`panel`]: Panel render model and inbound actions
//! - [`events`]: Workspace events and refresh scheduling
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod index;
pub mod model;
pub mod notes;
pub mod panel;
pub mod store;
