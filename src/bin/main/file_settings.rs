use std::{
    fs, io,
    path::{Path, PathBuf},
};

use glance_core::settings::{PersistedSettings, SettingsStore};

const SETTINGS_MAGIC: u32 = 0x3153_4C47; // "GLS1"
const SETTINGS_VERSION: u8 = 1;
const SETTINGS_RECORD_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum FileSettingsError {
    #[error("settings file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings record is corrupted")]
    Corrupted,
}

/// Settings record kept in a small binary file next to the user's config.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    type Error = FileSettingsError;

    fn load(&mut self) -> Result<Option<PersistedSettings>, Self::Error> {
        let buf = match fs::read(&self.path) {
            Ok(buf) => buf,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        decode_record(&buf)
    }

    fn save(&mut self, settings: &PersistedSettings) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, encode_record(settings))?;
        Ok(())
    }
}

fn encode_record(settings: &PersistedSettings) -> [u8; SETTINGS_RECORD_LEN] {
    let mut buf = [0xFFu8; SETTINGS_RECORD_LEN];
    buf[0..4].copy_from_slice(&SETTINGS_MAGIC.to_le_bytes());
    buf[4] = SETTINGS_VERSION;
    buf[5] = 0;
    buf[6..8].copy_from_slice(&settings.wpm.to_le_bytes());
    let checksum = checksum32(&buf[..8]);
    buf[8..12].copy_from_slice(&checksum.to_le_bytes());
    buf
}

fn decode_record(buf: &[u8]) -> Result<Option<PersistedSettings>, FileSettingsError> {
    if buf.len() < SETTINGS_RECORD_LEN {
        return Ok(None);
    }

    let magic = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    if magic != SETTINGS_MAGIC {
        return Ok(None);
    }

    match buf[4] {
        SETTINGS_VERSION => {
            let expected_checksum = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
            if checksum32(&buf[..8]) != expected_checksum {
                return Err(FileSettingsError::Corrupted);
            }
            let wpm = u16::from_le_bytes([buf[6], buf[7]]);
            Ok(Some(PersistedSettings::new(wpm)))
        }
        _ => Ok(None),
    }
}

fn checksum32(bytes: &[u8]) -> u32 {
    let mut hash = 0x811C9DC5u32;
    for b in bytes {
        hash ^= *b as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash
}
