//! JSON persistence of the player profile.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Profile;

/// File name of the save record inside the save directory.
pub const SAVE_FILE: &str = "animeTD_save.json";

/// Errors raised while reading or writing the save record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The save file or its directory could not be accessed.
    #[error("failed to access {path}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The save file does not contain a valid record.
    #[error("malformed save record")]
    Json(#[from] serde_json::Error),
}

/// Record written to disk: the profile and the time it was saved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Saved profile.
    pub player: Profile,
    /// Milliseconds since the Unix epoch when the record was written.
    #[serde(default)]
    pub timestamp: u64,
}

#[derive(Serialize)]
struct SaveRecordRef<'a> {
    player: &'a Profile,
    timestamp: u64,
}

/// Reads and writes the profile inside a save directory.
#[derive(Clone, Debug)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Creates a store that keeps its record in `dir`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SAVE_FILE),
        }
    }

    /// Location of the save record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the save record, returning `None` when none was written yet.
    pub fn load(&self) -> Result<Option<SaveRecord>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let record = serde_json::from_slice(&bytes)?;
        Ok(Some(record))
    }

    /// Loads the saved profile, falling back to a fresh one.
    ///
    /// Read failures are logged and swallowed; a loaded profile with an empty
    /// inventory receives the starter unit.
    pub fn load_or_new<R: Rng + ?Sized>(&self, rng: &mut R) -> Profile {
        match self.load() {
            Ok(Some(record)) => {
                let mut profile = record.player;
                profile.ensure_starter_unit(rng);
                log::info!(
                    "loaded level {} profile from {}",
                    profile.level(),
                    self.path.display()
                );
                profile
            }
            Ok(None) => Profile::new(rng),
            Err(error) => {
                log::warn!("could not load {}: {error}", self.path.display());
                Profile::new(rng)
            }
        }
    }

    /// Writes the profile, creating the save directory when needed.
    pub fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
            });
        let encoded = serde_json::to_vec_pretty(&SaveRecordRef {
            player: profile,
            timestamp,
        })?;
        fs::write(&self.path, encoded).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
