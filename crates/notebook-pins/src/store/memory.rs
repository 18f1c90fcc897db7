use super::mem_backend::MemBackend;
use super::repository::SettingsRepository;

pub type InMemoryRepository = SettingsRepository<MemBackend>;

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        SettingsRepository::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::config::{AUTO_MIGRATE_ON_MOVE_SETTING_KEY, MAX_PINS_SETTING_KEY};
    use crate::model::PinsState;
    use crate::store::backend::SettingsBackend;
    use crate::store::PinsRepository;
    use serde_json::json;

    pub struct RepoFixture {
        pub repo: InMemoryRepository,
    }

    impl Default for RepoFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RepoFixture {
        pub fn new() -> Self {
            Self {
                repo: InMemoryRepository::new(),
            }
        }

        pub fn with_max_pins(self, max: u32) -> Self {
            self.repo
                .backend
                .set_value(MAX_PINS_SETTING_KEY, json!(max))
                .unwrap();
            self
        }

        pub fn with_auto_migrate(self, enabled: bool) -> Self {
            self.repo
                .backend
                .set_value(AUTO_MIGRATE_ON_MOVE_SETTING_KEY, json!(enabled))
                .unwrap();
            self
        }

        /// Seeds the stored state with pins, in the given order per folder.
        pub fn with_pins(self, pins: &[(&str, &[&str])]) -> Self {
            let mut state = PinsState::empty();
            for (folder, notes) in pins {
                state.pins_by_folder_id.insert(
                    folder.to_string(),
                    notes.iter().map(|n| n.to_string()).collect(),
                );
            }
            self.repo.save_state(&state).unwrap();
            self
        }
    }
}
