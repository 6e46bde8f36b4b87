//! Append-only, mutex-guarded writer onto a shared file
//!
//! One `AppendLog` is shared (behind an `Arc`) by every task writing to the
//! same file. The lock spans a whole `append` call, so concurrent appends
//! never interleave mid-write.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Append-only shared file writer
#[derive(Debug)]
pub struct AppendLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl AppendLog {
    /// Opens `path` for appending, creating it (and its parent directory) if needed
    pub async fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        ensure_parent(&path).await?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Opens `path` truncated to zero length, discarding earlier content
    pub async fn open_fresh(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        ensure_parent(&path).await?;

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Appends `data` as one uninterrupted write
    pub async fn append(&self, data: &[u8]) -> io::Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(data).await?;
        file.flush().await
    }

    /// Appends `line` followed by a newline as one uninterrupted write
    pub async fn append_line(&self, line: &str) -> io::Result<()> {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');
        self.append(record.as_bytes()).await
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
