//! Shared types produced by the generators.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A complete output file, relative to the content root.
///
/// Pages are always written whole; nothing is appended or merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedPage {
    pub fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }

    /// Write the page under `root`, creating parent directories.
    ///
    /// Errors carry the full destination path.
    pub fn write(&self, root: &Path) -> Result<PathBuf, WriteError> {
        let dest = root.join(&self.path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| WriteError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&dest, &self.contents).map_err(|source| WriteError {
            path: dest.clone(),
            source,
        })?;
        Ok(dest)
    }
}

/// What one pipeline step did, for the build report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutput {
    /// Files written, relative to the content root.
    pub written: Vec<PathBuf>,
    /// Non-fatal problems worth showing the user.
    pub warnings: Vec<String>,
}

impl StepOutput {
    /// Write every page and record it.
    pub fn write_all(&mut self, root: &Path, pages: &[GeneratedPage]) -> Result<(), WriteError> {
        for page in pages {
            page.write(root)?;
            self.written.push(page.path.clone());
        }
        Ok(())
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

/// Failed to write a generated file.
#[derive(Error, Debug)]
#[error("failed to write {}: {source}", path.display())]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}
