use crate::error::Result;
use serde_json::Value;

/// Abstract interface for the host's key/value settings store.
/// This trait handles the "how" of storage (file vs memory),
/// while `SettingsRepository` handles the "what" (state decoding, normalization).
pub trait SettingsBackend {
    /// Read a raw setting value.
    /// Returns Ok(None) if the key has never been written.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn value(&self, key: &str) -> Result<Option<Value>>;

    /// Write a raw setting value, replacing any previous one.
    fn set_value(&self, key: &str, value: Value) -> Result<()>;
}
