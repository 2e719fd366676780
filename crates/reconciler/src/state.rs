use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mal::AnimeListEntry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::EpisodeLedger;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to read or write state file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse state file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("another run appears to be active (lock file {} exists)", .0.display())]
    Locked(PathBuf),
}

/// The durable record carried between runs: the last subscription snapshot
/// and the episode ledger.
///
/// Serde renames keep the JSON keys the state file always used, so an
/// existing `data.json` loads unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Last fetched "watching" snapshot; absent until the first successful
    /// fetch.
    #[serde(
        rename = "mal_anime_cache",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub subscriptions: Option<Vec<AnimeListEntry>>,

    #[serde(rename = "anime_episodes", default)]
    pub episodes: EpisodeLedger,
}

/// Loads and saves the persisted state wholesale.
///
/// Precondition: at most one run executes at a time. There is no merge on
/// save — concurrent runs race on the single write and can silently lose
/// ledger updates. The invoking scheduler must serialize runs; [`RunLock`]
/// makes the constraint explicit.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state, synthesizing an empty one when no file exists yet.
    pub async fn load(&self) -> Result<PersistedState, StateError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(PersistedState::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the state file with the full record, atomically.
    /// Uses write-to-temp-then-rename so a crash mid-write cannot leave a
    /// truncated file behind.
    pub async fn save(&self, state: &PersistedState) -> Result<(), StateError> {
        let json = serde_json::to_string_pretty(state)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}

/// Best-effort cross-run exclusion: a lock file created with `create_new`,
/// removed when the guard drops. A crashed run leaves the file behind for
/// the operator to remove.
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self, StateError> {
        let path = path.into();

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(StateError::Locked(path)),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove lock file {}: {}", self.path.display(), e);
        }
    }
}
