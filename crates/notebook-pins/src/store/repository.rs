use super::backend::SettingsBackend;
use super::fs_backend::FsBackend;
use super::PinsRepository;
use crate::config::{
    normalize_bool_setting, normalize_max_pins, AUTO_MIGRATE_ON_MOVE_SETTING_KEY,
    MAX_PINS_SETTING_KEY, SHOW_HORIZONTAL_SCROLLBAR_SETTING_KEY, STATE_SETTING_KEY,
};
use crate::error::{PinsError, Result};
use crate::model::{now_millis, parse_stored_state, PinsState};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

pub type FileRepository = SettingsRepository<FsBackend>;

impl FileRepository {
    /// Repository keeping `settings.json` under `root`.
    pub fn new(root: PathBuf) -> Self {
        SettingsRepository::with_backend(FsBackend::new(root))
    }
}

/// [`PinsRepository`] over a key/value [`SettingsBackend`].
pub struct SettingsRepository<B: SettingsBackend> {
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: SettingsBackend> SettingsRepository<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Cosmetic panel preference; not consulted by the pin logic.
    pub fn show_horizontal_scrollbar(&self) -> Result<bool> {
        Ok(normalize_bool_setting(&self.raw(SHOW_HORIZONTAL_SCROLLBAR_SETTING_KEY)?))
    }

    fn raw(&self, key: &str) -> Result<Value> {
        Ok(self.backend.value(key)?.unwrap_or(Value::Null))
    }
}

impl<B: SettingsBackend> PinsRepository for SettingsRepository<B> {
    fn load_state(&self) -> Result<PinsState> {
        Ok(parse_stored_state(&self.raw(STATE_SETTING_KEY)?))
    }

    fn save_state(&self, state: &PinsState) -> Result<()> {
        let mut sanitized = state.sanitized();
        sanitized.updated_at = now_millis();

        let encoded = serde_json::to_string(&sanitized).map_err(PinsError::Serialization)?;
        self.backend
            .set_value(STATE_SETTING_KEY, Value::String(encoded))?;
        debug!(
            folders = sanitized.pins_by_folder_id.len(),
            pins = sanitized.note_to_folder_index.len(),
            "saved pin state"
        );
        Ok(())
    }

    fn max_pins(&self) -> Result<u32> {
        Ok(normalize_max_pins(&self.raw(MAX_PINS_SETTING_KEY)?))
    }

    fn auto_migrate_on_move(&self) -> Result<bool> {
        Ok(normalize_bool_setting(
            &self.raw(AUTO_MIGRATE_ON_MOVE_SETTING_KEY)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use crate::store::memory::InMemoryRepository;
    use serde_json::json;

    #[test]
    fn test_load_state_missing_is_empty() {
        let repo = InMemoryRepository::new();
        let state = repo.load_state().unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_save_writes_sanitized_json_string() {
        let repo = InMemoryRepository::new();
        let mut state = PinsState::empty_at(1);
        state
            .pins_by_folder_id
            .insert("f1".into(), vec!["n1".into(), "n1".into()]);

        repo.save_state(&state).unwrap();

        let stored = repo.backend().value(STATE_SETTING_KEY).unwrap().unwrap();
        let Value::String(text) = stored else {
            panic!("state should be stored as a string");
        };
        let decoded: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded["pinsByFolderId"], json!({ "f1": ["n1"] }));
        assert_eq!(decoded["noteToFolderIndex"], json!({ "n1": "f1" }));
        assert!(decoded["updatedAt"].as_i64().unwrap() > 1);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let repo = InMemoryRepository::new();
        let mut state = PinsState::empty_at(1);
        state
            .pins_by_folder_id
            .insert("f1".into(), vec!["n2".into(), "n1".into()]);
        repo.save_state(&state).unwrap();

        let loaded = repo.load_state().unwrap();
        assert_eq!(loaded.pinned_ids("f1"), vec!["n2", "n1"]);
        assert_eq!(loaded.folder_of("n1"), Some("f1"));
    }

    #[test]
    fn test_load_corrupt_state_is_empty() {
        let backend = MemBackend::new();
        backend
            .set_value(STATE_SETTING_KEY, json!("{broken"))
            .unwrap();
        let repo = SettingsRepository::with_backend(backend);
        assert!(repo.load_state().unwrap().is_empty());
    }

    #[test]
    fn test_settings_are_normalized() {
        let backend = MemBackend::new();
        backend.set_value(MAX_PINS_SETTING_KEY, json!("3")).unwrap();
        backend
            .set_value(AUTO_MIGRATE_ON_MOVE_SETTING_KEY, json!("yes"))
            .unwrap();
        backend
            .set_value(SHOW_HORIZONTAL_SCROLLBAR_SETTING_KEY, json!(0))
            .unwrap();
        let repo = SettingsRepository::with_backend(backend);

        assert_eq!(repo.max_pins().unwrap(), 3);
        assert!(repo.auto_migrate_on_move().unwrap());
        assert!(!repo.show_horizontal_scrollbar().unwrap());
    }

    #[test]
    fn test_missing_settings_default() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.max_pins().unwrap(), 0);
        assert!(!repo.auto_migrate_on_move().unwrap());
        assert!(!repo.show_horizontal_scrollbar().unwrap());
    }

    #[test]
    fn test_save_propagates_backend_failure() {
        let repo = InMemoryRepository::new();
        repo.backend().set_simulate_write_error(true);
        let result = repo.save_state(&PinsState::empty());
        assert!(matches!(result, Err(PinsError::Store(_))));
    }
}
