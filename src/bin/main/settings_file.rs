//! `SettingsStore` backed by a TOML file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use aeroread_core::{
    engine::GroupSize,
    error::ConfigError,
    session::bookmark::Bookmark,
    settings::{PersistedSettings, SettingsStore},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(super) enum SettingsFileError {
    #[error("settings file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings file is malformed: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("settings could not be encoded: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SettingsRecord {
    wpm: u16,
    group_size: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bookmark: Option<BookmarkRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BookmarkRecord {
    fingerprint: String,
    #[serde(default)]
    chapter: usize,
    index: usize,
    saved_at_ms: u64,
}

impl From<&PersistedSettings> for SettingsRecord {
    fn from(settings: &PersistedSettings) -> Self {
        Self {
            wpm: settings.wpm,
            group_size: settings.group_size.get() as u8,
            bookmark: settings.bookmark.as_ref().map(|bookmark| BookmarkRecord {
                fingerprint: bookmark.fingerprint.clone(),
                chapter: bookmark.chapter,
                index: bookmark.index,
                saved_at_ms: bookmark.saved_at_ms,
            }),
        }
    }
}

impl TryFrom<SettingsRecord> for PersistedSettings {
    type Error = ConfigError;

    fn try_from(record: SettingsRecord) -> Result<Self, Self::Error> {
        let group_size = GroupSize::try_from(record.group_size)?;
        let bookmark = record.bookmark.map(|bookmark| Bookmark {
            fingerprint: bookmark.fingerprint,
            chapter: bookmark.chapter,
            index: bookmark.index,
            saved_at_ms: bookmark.saved_at_ms,
        });
        Ok(PersistedSettings::new(record.wpm, group_size).with_bookmark(bookmark))
    }
}

#[derive(Debug)]
pub(super) struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub(super) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for TomlSettingsStore {
    type Error = SettingsFileError;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let record: SettingsRecord = toml::from_str(&raw)?;
        Ok(Some(record.try_into()?))
    }

    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let encoded = toml::to_string_pretty(&SettingsRecord::from(settings))?;
        // Readers only ever see a complete file.
        let staging = self.path.with_extension("toml.tmp");
        fs::write(&staging, encoded)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> TomlSettingsStore {
        TomlSettingsStore::new(dir.path().join("nested").join("settings.toml"))
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let settings = PersistedSettings::new(650, GroupSize::Two).with_bookmark(Some(Bookmark {
            fingerprint: "-1k3x".to_owned(),
            chapter: 2,
            index: 118,
            saved_at_ms: 42_000,
        }));

        store.save(&settings).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), Some(settings));
    }

    #[test]
    fn bad_group_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "wpm = 300\ngroup_size = 5\n").unwrap();

        assert!(matches!(
            store.load(),
            Err(SettingsFileError::Invalid(ConfigError::InvalidGroupSize(5)))
        ));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "wpm = [").unwrap();

        assert!(matches!(store.load(), Err(SettingsFileError::Parse(_))));
    }
}
