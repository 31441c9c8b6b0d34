use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};

/// A file on disk, read lazily, optionally carrying replacement content.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    raw: OnceLock<Vec<u8>>,
    dirty: bool,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            raw: OnceLock::new(),
            dirty: false,
        }
    }

    /// In-memory content for `path`; marked dirty so `write` persists it.
    pub fn with_content(path: impl Into<PathBuf>, raw: impl Into<Vec<u8>>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(raw.into());
        Self {
            path: path.into(),
            raw: cell,
            dirty: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }

    pub fn raw(&self) -> Result<&[u8]> {
        if let Some(raw) = self.raw.get() {
            return Ok(raw.as_slice());
        }
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        Ok(self.raw.get_or_init(|| bytes).as_slice())
    }

    pub fn content(&self) -> Result<&str> {
        let raw = self.raw()?;
        std::str::from_utf8(raw)
            .with_context(|| format!("{} is not valid UTF-8", self.path.display()))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Same content and dirty state, different destination.
    pub fn relocated(self, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..self
        }
    }

    /// Write to disk if dirty, creating parent directories. Returns whether
    /// anything was written.
    pub fn write(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        let raw = self.raw()?.to_vec();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        self.dirty = false;
        Ok(true)
    }
}
