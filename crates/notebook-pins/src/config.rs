//! # Configuration
//!
//! Notebook pins keeps its settings in the host's key/value settings store, next to the
//! serialized pin state. Defaults are declared with [`confique`], which also allows
//! loading overrides from environment variables and an optional TOML file.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `notebookPins.maxPinsPerNotebook` | `0` | Capacity per notebook, `0` for unlimited |
//! | `notebookPins.autoMigrateOnMove` | `false` | Follow a note to its new notebook when it moves |
//! | `notebookPins.showHorizontalScrollbar` | `false` | Cosmetic panel preference |
//!
//! The pin state itself lives under `notebookPins.state` as a JSON-encoded string.
//!
//! ## Raw Values
//!
//! Values read back from the settings store are untyped and may have been written by
//! anything. They are always re-normalized on read:
//! - [`normalize_max_pins`]: numbers or integer-prefixed strings, floored; anything
//!   negative, non-finite or non-numeric becomes `0`.
//! - [`normalize_bool_setting`]: booleans pass through, numbers test non-zero, and the
//!   strings `1`/`true`/`yes`/`on` are true. Everything else is false.

use confique::Config;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::Result;
use crate::store::backend::SettingsBackend;

pub const STATE_SETTING_KEY: &str = "notebookPins.state";
pub const MAX_PINS_SETTING_KEY: &str = "notebookPins.maxPinsPerNotebook";
pub const AUTO_MIGRATE_ON_MOVE_SETTING_KEY: &str = "notebookPins.autoMigrateOnMove";
pub const SHOW_HORIZONTAL_SCROLLBAR_SETTING_KEY: &str = "notebookPins.showHorizontalScrollbar";

/// Default values for the user-facing settings.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PinsConfig {
    /// Maximum pins per notebook. 0 means unlimited.
    #[config(default = 0, env = "NOTEBOOK_PINS_MAX_PINS_PER_NOTEBOOK")]
    pub max_pins_per_notebook: u32,

    /// Move a pin along with its note when the note changes notebook.
    #[config(default = false, env = "NOTEBOOK_PINS_AUTO_MIGRATE_ON_MOVE")]
    pub auto_migrate_on_move: bool,

    #[config(default = false, env = "NOTEBOOK_PINS_SHOW_HORIZONTAL_SCROLLBAR")]
    pub show_horizontal_scrollbar: bool,
}

impl Default for PinsConfig {
    fn default() -> Self {
        Self {
            max_pins_per_notebook: 0,
            auto_migrate_on_move: false,
            show_horizontal_scrollbar: false,
        }
    }
}

impl PinsConfig {
    /// Loads defaults layered under environment variables and an optional TOML file.
    /// Environment variables take priority over the file.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    fn entries(&self) -> [(&'static str, Value); 3] {
        [
            (
                MAX_PINS_SETTING_KEY,
                Value::from(self.max_pins_per_notebook),
            ),
            (
                AUTO_MIGRATE_ON_MOVE_SETTING_KEY,
                Value::from(self.auto_migrate_on_move),
            ),
            (
                SHOW_HORIZONTAL_SCROLLBAR_SETTING_KEY,
                Value::from(self.show_horizontal_scrollbar),
            ),
        ]
    }
}

/// Writes every setting from `config` that the backend doesn't hold yet, plus an
/// empty state slot. Existing values are left alone.
///
/// Returns the number of keys written.
pub fn register_defaults<B: SettingsBackend>(backend: &B, config: &PinsConfig) -> Result<usize> {
    let mut written = 0;
    let state_slot = (STATE_SETTING_KEY, Value::String(String::new()));
    for (key, value) in config.entries().into_iter().chain([state_slot]) {
        if backend.value(key)?.is_none() {
            backend.set_value(key, value)?;
            written += 1;
        }
    }
    Ok(written)
}

pub fn normalize_max_pins(raw: &Value) -> u32 {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() && n >= 0.0 => n.floor().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

pub fn normalize_bool_setting(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        _ => false,
    }
}

/// Leading-integer parse: optional whitespace and sign, then digits. `"12px"` is 12.
fn parse_int_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude: f64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
