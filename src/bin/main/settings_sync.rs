use aeroread_core::settings::{PersistedSettings, SettingsStore};
use log::{info, warn};

use super::SETTINGS_SAVE_DEBOUNCE_MS;

/// Debounces settings writes so a burst of key presses costs one save.
pub(super) struct SettingsSyncState {
    last_saved: PersistedSettings,
    pending: Option<(PersistedSettings, u64)>,
}

impl SettingsSyncState {
    pub(super) fn new(initial: PersistedSettings) -> Self {
        Self {
            last_saved: initial,
            pending: None,
        }
    }

    pub(super) fn track_current(&mut self, current: PersistedSettings, now_ms: u64) {
        if current == self.last_saved {
            self.pending = None;
            return;
        }

        match self.pending.as_mut() {
            Some((pending, changed_at_ms)) => {
                if *pending != current {
                    *pending = current;
                    *changed_at_ms = now_ms;
                }
            }
            None => {
                self.pending = Some((current, now_ms));
            }
        }
    }

    pub(super) fn flush_if_due<S>(&mut self, store: &mut S, now_ms: u64)
    where
        S: SettingsStore,
        S::Error: core::fmt::Display,
    {
        let Some((_, changed_at_ms)) = self.pending.as_ref() else {
            return;
        };

        if now_ms.saturating_sub(*changed_at_ms) < SETTINGS_SAVE_DEBOUNCE_MS {
            return;
        }

        self.flush(store, now_ms);
    }

    /// Write any pending change immediately.
    pub(super) fn flush<S>(&mut self, store: &mut S, now_ms: u64)
    where
        S: SettingsStore,
        S::Error: core::fmt::Display,
    {
        let Some((candidate, _)) = self.pending.take() else {
            return;
        };

        match store.save(&candidate) {
            Ok(()) => {
                info!("settings: saved wpm={} group={}", candidate.wpm, candidate.group_size.get());
                self.last_saved = candidate;
            }
            Err(err) => {
                // Retry after another debounce window.
                warn!("settings: save failed: {}", err);
                self.pending = Some((candidate, now_ms));
            }
        }
    }

    #[cfg(test)]
    fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
