//! Idempotent document persistence
//!
//! A document is stored under a file name derived from its URL. If that
//! file already exists the save succeeds without touching the network,
//! which is what lets an interrupted run resume where it stopped.

use reqwest::Client;
use std::path::{Path, PathBuf};

use crate::storage::{SaveError, SaveResult};
use crate::url::derive_file_name;

/// Outcome of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Payload fetched and written
    Saved { path: PathBuf, bytes: usize },
    /// A file with the derived name already existed; nothing was fetched
    AlreadyPresent { path: PathBuf },
}

impl SaveOutcome {
    /// Path of the stored artifact
    pub fn path(&self) -> &Path {
        match self {
            Self::Saved { path, .. } | Self::AlreadyPresent { path } => path,
        }
    }
}

/// Downloads documents into a flat directory, at most once per file name
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    client: Client,
}

impl ArtifactStore {
    /// Creates a store fetching through `client`
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Saves the document at `url` into `destination_dir`
    ///
    /// # Steps
    ///
    /// 1. Derive the file name and join it onto the directory
    /// 2. If a file exists there, return `AlreadyPresent` with no network call
    /// 3. GET the payload; any non-2xx status is an error
    /// 4. Create the directory if missing
    /// 5. Write to `<name>.part`, then rename into place
    ///
    /// Every failure aborts only this save.
    pub async fn save(&self, url: &str, destination_dir: &Path) -> SaveResult<SaveOutcome> {
        let file_name = derive_file_name(url).map_err(|source| SaveError::InvalidFileName {
            url: url.to_string(),
            source,
        })?;
        let path = destination_dir.join(&file_name);

        if is_file(&path).await {
            tracing::debug!("{} already exists, skipping download", path.display());
            return Ok(SaveOutcome::AlreadyPresent { path });
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SaveError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SaveError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let payload = response
            .bytes()
            .await
            .map_err(|source| SaveError::Transport {
                url: url.to_string(),
                source,
            })?;

        tokio::fs::create_dir_all(destination_dir)
            .await
            .map_err(|source| SaveError::CreateDir {
                path: destination_dir.to_path_buf(),
                source,
            })?;

        write_via_partial(&path, &file_name, &payload).await?;

        Ok(SaveOutcome::Saved {
            path,
            bytes: payload.len(),
        })
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

/// Writes `payload` next to `path` and renames it into place
///
/// The final name only ever appears once the payload is complete.
async fn write_via_partial(path: &Path, file_name: &str, payload: &[u8]) -> SaveResult<()> {
    let partial = path.with_file_name(format!("{}.part", file_name));

    let result = async {
        tokio::fs::write(&partial, payload).await?;
        tokio::fs::rename(&partial, path).await
    }
    .await;

    if let Err(source) = result {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(SaveError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}
