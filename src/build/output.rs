//! Writing expanded pages to disk.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use super::paths::backup_path_for;
use crate::config::ExistingOutput;

#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    #[error("failed to back up {} to {}: {source}", from.display(), to.display())]
    Backup {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What happened when an output was written.
#[derive(Debug)]
pub struct WriteOutcome {
    pub path: PathBuf,
    /// Where the previous file went, if one existed and was backed up
    pub backup: Option<PathBuf>,
}

/// Writes outputs, preserving or replacing existing files per policy.
pub struct OutputWriter {
    policy: ExistingOutput,
    backup_dir: PathBuf,
}

impl OutputWriter {
    pub fn new(policy: ExistingOutput, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            policy,
            backup_dir: backup_dir.into(),
        }
    }

    pub fn write(&self, path: &Path, contents: &str) -> Result<WriteOutcome, OutputError> {
        let backup = match self.policy {
            ExistingOutput::Backup if path.exists() => Some(self.backup(path)?),
            _ => None,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| OutputError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, contents).map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(WriteOutcome {
            path: path.to_path_buf(),
            backup,
        })
    }

    /// Move the existing file at `path` into the backup directory.
    fn backup(&self, path: &Path) -> Result<PathBuf, OutputError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let mut seq = 0;
        let mut to = backup_path_for(path, &self.backup_dir, timestamp, seq);
        while to.exists() {
            seq += 1;
            to = backup_path_for(path, &self.backup_dir, timestamp, seq);
        }
        let err = |source: std::io::Error| OutputError::Backup {
            from: path.to_path_buf(),
            to: to.clone(),
            source,
        };

        std::fs::create_dir_all(&self.backup_dir).map_err(err)?;

        info!("moving existing {} to {}", path.display(), to.display());
        if std::fs::rename(path, &to).is_err() {
            // rename can't cross filesystems (e.g. into /tmp)
            std::fs::copy(path, &to).map_err(err)?;
            std::fs::remove_file(path).map_err(err)?;
        }

        Ok(to)
    }
}
