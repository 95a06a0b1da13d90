use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::profile::Profile;
use crate::model::progress::ProgressBook;

const PROFILES_FILE: &str = "profiles.json";
const GUARDIAN_FILE: &str = "guardian.json";
const PROGRESS_FILE: &str = "progress.json";
const SETUP_MARKER: &str = "setup_complete";

/// Guardian-only configuration: the Gemini key, the settings PIN and the
/// recovery answers (stored lowercase).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardianData {
    pub api_key: String,
    pub pin: String,
    pub recovery: RecoveryAnswers,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecoveryAnswers {
    pub color: String,
    pub city: String,
    pub team: String,
}

/// All persisted state lives as JSON files under one directory. Loads fall
/// back to defaults so a wiped or corrupt file never takes the app down;
/// saves report failures for the caller to surface.
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// The per-user location, `<config dir>/bodhi`.
    pub fn open() -> Self {
        let mut root = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        root.push("bodhi");
        Self::at(root)
    }

    pub fn at(root: PathBuf) -> Self {
        if let Err(e) = fs::create_dir_all(&root) {
            warn!(path = %root.display(), %e, "could not create data directory");
        }
        Self { root }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Option<T> {
        let path = self.path(file);
        let text = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(path = %path.display(), %e, "ignoring unreadable data file");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> anyhow::Result<()> {
        let path = self.path(file);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))
    }

    pub fn load_profiles(&self) -> Vec<Profile> {
        self.read_json(PROFILES_FILE).unwrap_or_default()
    }

    pub fn save_profiles(&self, profiles: &[Profile]) -> anyhow::Result<()> {
        self.write_json(PROFILES_FILE, &profiles)
    }

    pub fn load_guardian(&self) -> GuardianData {
        self.read_json(GUARDIAN_FILE).unwrap_or_default()
    }

    pub fn save_guardian(&self, guardian: &GuardianData) -> anyhow::Result<()> {
        self.write_json(GUARDIAN_FILE, guardian)
    }

    pub fn load_progress(&self) -> ProgressBook {
        self.read_json(PROGRESS_FILE).unwrap_or_default()
    }

    pub fn save_progress(&self, progress: &ProgressBook) -> anyhow::Result<()> {
        self.write_json(PROGRESS_FILE, progress)
    }

    pub fn setup_complete(&self) -> bool {
        self.path(SETUP_MARKER).exists()
    }

    pub fn mark_setup_complete(&self) -> anyhow::Result<()> {
        let path = self.path(SETUP_MARKER);
        fs::write(&path, "true").with_context(|| format!("writing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::module::ModuleType;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path().join("bodhi"));
        (dir, store)
    }

    #[test]
    fn missing_files_yield_defaults() {
        let (_dir, store) = temp_store();
        assert!(store.load_profiles().is_empty());
        assert!(store.load_guardian().pin.is_empty());
        assert!(store.load_progress().stats_for("anyone").is_empty());
        assert!(!store.setup_complete());
    }

    #[test]
    fn profiles_round_trip() {
        let (_dir, store) = temp_store();
        let profiles = vec![Profile::new("Maya", 8), Profile::new("Ben", 4)];
        store.save_profiles(&profiles).unwrap();

        let loaded = store.load_profiles();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "Maya");
        assert_eq!(loaded[1].age, 4);
    }

    #[test]
    fn guardian_data_round_trips() {
        let (_dir, store) = temp_store();
        let guardian = GuardianData {
            api_key: "AIzaTest".into(),
            pin: "4321".into(),
            recovery: RecoveryAnswers {
                color: "blue".into(),
                city: "oslo".into(),
                team: "tigers".into(),
            },
        };
        store.save_guardian(&guardian).unwrap();

        let loaded = store.load_guardian();
        assert_eq!(loaded.pin, "4321");
        assert_eq!(loaded.recovery.city, "oslo");
    }

    #[test]
    fn progress_round_trips() {
        let (_dir, store) = temp_store();
        let mut book = ProgressBook::default();
        book.record_attempt("Maya", ModuleType::Math, 5, 5);
        store.save_progress(&book).unwrap();

        let loaded = store.load_progress();
        assert_eq!(loaded.record("Maya", ModuleType::Math).unwrap().attempts, 1);
    }

    #[test]
    fn corrupt_files_fall_back_to_defaults() {
        let (_dir, store) = temp_store();
        fs::write(store.path(PROFILES_FILE), "{not json").unwrap();
        assert!(store.load_profiles().is_empty());
    }

    #[test]
    fn setup_marker_persists() {
        let (_dir, store) = temp_store();
        store.mark_setup_complete().unwrap();
        assert!(store.setup_complete());
    }
}
