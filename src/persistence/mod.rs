//! Save/load persistence with recovery
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic replace (tmp → save, old save → backup)
//! - Corruption detection and fallback to the backup

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Current envelope format version
pub const FORMAT_VERSION: u32 = 1;

/// Persistence failures
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported save version {found}")]
    UnsupportedVersion { found: u32 },
}

/// On-disk wrapper around the saved payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub version: u32,
    pub data: T,
}

/// Sibling path with an extra extension (`scores.json` → `scores.json.bak`)
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Backup file kept next to `path`
pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, ".bak")
}

/// Write `data` to `path`, rotating the previous file to the backup slot
pub fn save<T: Serialize>(path: &Path, data: &T) -> Result<(), PersistenceError> {
    let envelope = Envelope {
        version: FORMAT_VERSION,
        data,
    };
    let json = serde_json::to_string_pretty(&envelope)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = with_suffix(path, ".tmp");
    fs::write(&tmp, json)?;
    if path.exists() {
        fs::rename(path, backup_path(path))?;
    }
    fs::rename(&tmp, path)?;
    log::debug!("Saved {}", path.display());
    Ok(())
}

fn read_envelope<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let json = fs::read_to_string(path)?;
    let envelope: Envelope<T> = serde_json::from_str(&json)?;
    if envelope.version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: envelope.version,
        });
    }
    Ok(envelope.data)
}

/// Load `path`, falling back to its backup when the primary is corrupt.
///
/// `Ok(None)` means neither file exists.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    let backup = backup_path(path);
    if !path.exists() && !backup.exists() {
        return Ok(None);
    }

    match read_envelope(path) {
        Ok(data) => Ok(Some(data)),
        Err(primary_err) => {
            if !backup.exists() {
                return Err(primary_err);
            }
            log::warn!(
                "{} unreadable ({primary_err}), recovering from backup",
                path.display()
            );
            read_envelope(&backup).map(Some)
        }
    }
}
