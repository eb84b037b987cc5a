//! # Page Snapshots
//!
//! Writes the rendered page to disk so a browser can display it. A write only
//! happens when the HTML changed since the last one, and goes through a
//! temporary file so readers never see a partial page.
//!
//! [`FragmentFile`] keeps the page fragment (`#!skin=..`) across restarts the
//! way a browser keeps it across reloads.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;

/// Writes page HTML to a fixed path.
#[derive(Debug)]
pub struct SnapshotWriter {
    path: PathBuf,
    last: Option<String>,
    writes: u64,
}

impl SnapshotWriter {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: None,
            writes: 0,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of files written so far.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Writes `html` unless it equals the previous write. Returns true if the
    /// file was written.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written or renamed into place.
    pub async fn write_if_changed(&mut self, html: String) -> Result<bool> {
        if self.last.as_deref() == Some(html.as_str()) {
            return Ok(false);
        }

        replace_file(&self.path, &html).await?;

        self.writes += 1;
        if self.writes == 1 {
            debug!("First page snapshot written to {}", self.path.display());
        }
        self.last = Some(html);
        Ok(true)
    }
}

/// Replaces `path` with `contents` through a temporary sibling file.
async fn replace_file(path: &Path, contents: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, contents.as_bytes()).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Remembers the last page fragment in a small text file.
#[derive(Debug)]
pub struct FragmentFile {
    path: Option<PathBuf>,
    last: Option<String>,
}

impl FragmentFile {
    /// An empty `path` disables the file.
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self {
            path: (!path.is_empty()).then(|| PathBuf::from(path)),
            last: None,
        }
    }

    /// Fragment saved by a previous run, if any.
    pub async fn load(&self) -> Option<String> {
        let path = self.path.as_ref()?;
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let fragment = contents.trim();
                (!fragment.is_empty()).then(|| fragment.to_string())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Ignoring saved fragment {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Saves `fragment` unless it equals the last save. Returns true if the
    /// file was written.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be written.
    pub async fn save_if_changed(&mut self, fragment: &str) -> Result<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };
        if fragment.is_empty() || self.last.as_deref() == Some(fragment) {
            return Ok(false);
        }
        replace_file(path, fragment).await?;
        debug!("Saved fragment {} to {}", fragment, path.display());
        self.last = Some(fragment.to_string());
        Ok(true)
    }
}
