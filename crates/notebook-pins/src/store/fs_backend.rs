use super::backend::SettingsBackend;
use crate::error::{PinsError, Result};
use directories::ProjectDirs;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

const SETTINGS_FILE: &str = "settings.json";

/// Settings backend persisting every key in a single JSON object file.
///
/// A settings file that isn't a JSON object loads as empty and is replaced on the next
/// write. Only I/O failures are errors.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Backend rooted in the OS-appropriate data directory, if one can be determined.
    pub fn in_default_location() -> Option<Self> {
        ProjectDirs::from("", "", "notebook-pins")
            .map(|dirs| Self::new(dirs.data_dir().to_path_buf()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(PinsError::Io)?;
        }
        Ok(())
    }

    fn load_all(&self) -> Result<Map<String, Value>> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(path).map_err(PinsError::Io)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => {
                warn!("{} does not contain a JSON object, starting empty", SETTINGS_FILE);
                Ok(Map::new())
            }
            Err(err) => {
                warn!("discarding unparsable {}: {err}", SETTINGS_FILE);
                Ok(Map::new())
            }
        }
    }
}

impl SettingsBackend for FsBackend {
    fn value(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.load_all()?.remove(key))
    }

    fn set_value(&self, key: &str, value: Value) -> Result<()> {
        self.ensure_dir(&self.root)?;

        let mut all = self.load_all()?;
        all.insert(key.to_string(), value);
        let content =
            serde_json::to_string_pretty(&Value::Object(all)).map_err(PinsError::Serialization)?;

        // Atomic write
        let tmp_file = self.root.join(format!(".settings-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(PinsError::Io)?;
        fs::rename(&tmp_file, self.settings_path()).map_err(PinsError::Io)?;

        Ok(())
    }
}
