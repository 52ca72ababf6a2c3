//! Reader configuration and the persisted settings abstraction.

use crate::{engine::GroupSize, error::ConfigError, session::bookmark::Bookmark};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReaderConfig {
    pub wpm: u16,
    pub min_wpm: u16,
    pub max_wpm: u16,
    pub wpm_step: u16,
    pub group_size: GroupSize,
    pub rewind_words: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            wpm: 400,
            min_wpm: 100,
            max_wpm: 1_500,
            wpm_step: 50,
            group_size: GroupSize::One,
            rewind_words: 10,
        }
    }
}

impl ReaderConfig {
    /// Check bounds and pull `wpm` into `[min_wpm, max_wpm]`.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.min_wpm == 0 || self.min_wpm > self.max_wpm {
            return Err(ConfigError::InvalidRateBounds {
                min: self.min_wpm,
                max: self.max_wpm,
            });
        }
        if self.wpm_step == 0 {
            return Err(ConfigError::ZeroRateStep);
        }
        self.wpm = self.clamp_wpm(self.wpm);
        Ok(self)
    }

    pub fn clamp_wpm(&self, wpm: u16) -> u16 {
        wpm.clamp(self.min_wpm, self.max_wpm)
    }

    /// Step the configured rate; returns whether it changed.
    pub fn adjust_wpm(&mut self, increase: bool) -> bool {
        let next = if increase {
            self.wpm.saturating_add(self.wpm_step).min(self.max_wpm)
        } else {
            self.wpm.saturating_sub(self.wpm_step).max(self.min_wpm)
        };

        if next != self.wpm {
            self.wpm = next;
            true
        } else {
            false
        }
    }
}

/// User-tunable settings that should survive restarts.
#[derive(Clone, Debug, PartialEq)]
pub struct PersistedSettings {
    pub wpm: u16,
    pub group_size: GroupSize,
    pub bookmark: Option<Bookmark>,
}

impl PersistedSettings {
    pub const fn new(wpm: u16, group_size: GroupSize) -> Self {
        Self {
            wpm,
            group_size,
            bookmark: None,
        }
    }

    pub fn with_bookmark(mut self, bookmark: Option<Bookmark>) -> Self {
        self.bookmark = bookmark;
        self
    }

    /// Overlay onto `config`, keeping its bounds.
    pub fn apply_to(&self, config: &mut ReaderConfig) {
        config.wpm = config.clamp_wpm(self.wpm);
        config.group_size = self.group_size;
    }
}

/// Abstract settings persistence backend.
pub trait SettingsStore {
    type Error;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error>;
    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error>;
}
