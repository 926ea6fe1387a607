//! Persisted user settings abstraction.

/// User-tunable settings that should survive restarts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PersistedSettings {
    pub wpm: u16,
}

impl PersistedSettings {
    pub const fn new(wpm: u16) -> Self {
        Self { wpm }
    }

    /// Restored values may come from an older build with other limits.
    pub fn clamped(self, min_wpm: u16, max_wpm: u16) -> Self {
        Self {
            wpm: self.wpm.clamp(min_wpm, max_wpm),
        }
    }
}

/// Abstract settings persistence backend.
pub trait SettingsStore {
    type Error;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error>;
    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error>;
}
