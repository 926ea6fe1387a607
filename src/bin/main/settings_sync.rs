use glance_core::settings::{PersistedSettings, SettingsStore};
use log::{info, warn};

use super::{SETTINGS_SAVE_DEBOUNCE_MS, file_settings::FileSettingsStore};

/// Debounces WPM changes so a burst of `+`/`-` presses writes once.
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

    pub(super) fn flush_if_due(&mut self, store: Option<&mut FileSettingsStore>, now_ms: u64) {
        let Some((candidate, changed_at_ms)) = self.pending else {
            return;
        };

        if now_ms.saturating_sub(changed_at_ms) < SETTINGS_SAVE_DEBOUNCE_MS {
            return;
        }

        self.flush(store, candidate, now_ms);
    }

    /// Writes any pending change regardless of the debounce window.
    pub(super) fn flush_now(&mut self, store: Option<&mut FileSettingsStore>, now_ms: u64) {
        if let Some((candidate, _)) = self.pending {
            self.flush(store, candidate, now_ms);
        }
    }

    fn flush(
        &mut self,
        store: Option<&mut FileSettingsStore>,
        candidate: PersistedSettings,
        now_ms: u64,
    ) {
        match store {
            Some(store) => match store.save(&candidate) {
                Ok(()) => {
                    info!("settings: saved wpm={}", candidate.wpm);
                    self.last_saved = candidate;
                    self.pending = None;
                }
                Err(err) => {
                    warn!("settings: save failed, retrying later: {err}");
                    self.pending = Some((candidate, now_ms));
                }
            },
            None => {
                self.last_saved = candidate;
                self.pending = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_for_debounce_before_clearing_pending() {
        let mut sync = SettingsSyncState::new(PersistedSettings::new(300));
        sync.track_current(PersistedSettings::new(310), 0);
        sync.track_current(PersistedSettings::new(320), 400);

        sync.flush_if_due(None, 1_000);
        assert!(sync.pending.is_some());

        sync.flush_if_due(None, 400 + SETTINGS_SAVE_DEBOUNCE_MS);
        assert!(sync.pending.is_none());
        assert_eq!(sync.last_saved, PersistedSettings::new(320));
    }

    #[test]
    fn returning_to_saved_value_drops_pending() {
        let mut sync = SettingsSyncState::new(PersistedSettings::new(300));
        sync.track_current(PersistedSettings::new(310), 0);
        sync.track_current(PersistedSettings::new(300), 10);
        assert!(sync.pending.is_none());
    }
}
