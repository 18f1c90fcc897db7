use super::backend::SettingsBackend;
use crate::error::{PinsError, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory settings backend for testing and embedding.
///
/// Uses `RefCell` for interior mutability since the pins service is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `SettingsBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    values: RefCell<BTreeMap<String, Value>>,
    writes: RefCell<usize>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Number of successful writes so far. Lets tests assert that no-op operations
    /// don't persist.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl SettingsBackend for MemBackend {
    fn value(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set_value(&self, key: &str, value: Value) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(PinsError::Store("Simulated write error".to_string()));
        }
        self.values.borrow_mut().insert(key.to_string(), value);
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}
