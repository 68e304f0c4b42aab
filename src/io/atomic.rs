//! Whole-file writes that never leave a partial file at the target path.
//!
//! A single file goes through [`write_atomically`]. Files that must appear
//! together are written in two phases: [`stage`] each one, then publish the
//! set with [`commit_all`], which restores every previous file if any rename
//! fails.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{VarianceError, VarianceResult};

/// Suffix of the sibling file a write is staged in.
const STAGING_SUFFIX: &str = ".partial";

/// Suffix the previous file is kept under while a set is committed.
const BACKUP_SUFFIX: &str = ".previous";

fn sibling_path(path: &Path, suffix: &str) -> VarianceResult<PathBuf> {
    let mut name = path
        .file_name()
        .ok_or_else(|| {
            VarianceError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?
        .to_os_string();
    name.push(suffix);
    Ok(path.with_file_name(name))
}

fn staging_path(path: &Path) -> VarianceResult<PathBuf> {
    sibling_path(path, STAGING_SUFFIX)
}

/// Bytes written next to their target, waiting to be renamed into place.
#[derive(Debug)]
pub struct StagedFile {
    staging: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    /// Renames the staged bytes over the target.
    pub fn commit(self) -> VarianceResult<()> {
        fs::rename(&self.staging, &self.target).map_err(|e| {
            let _ = fs::remove_file(&self.staging);
            VarianceError::io(&self.target, e)
        })
    }

    /// Removes the staged bytes, leaving the target untouched.
    pub fn discard(self) {
        let _ = fs::remove_file(&self.staging);
    }

    /// Moves an existing target file aside, then renames the staged bytes
    /// into place. Returns the backup path when there was a file to keep.
    fn commit_with_backup(&self) -> VarianceResult<Option<PathBuf>> {
        let backup = if self.target.is_file() {
            let backup = sibling_path(&self.target, BACKUP_SUFFIX)?;
            fs::rename(&self.target, &backup).map_err(|e| VarianceError::io(&self.target, e))?;
            Some(backup)
        } else {
            None
        };

        match fs::rename(&self.staging, &self.target) {
            Ok(()) => Ok(backup),
            Err(e) => {
                if let Some(backup) = &backup {
                    let _ = fs::rename(backup, &self.target);
                }
                Err(VarianceError::io(&self.target, e))
            }
        }
    }
}

/// Writes `bytes` to the sibling staging file of `path`.
///
/// Parent directories are created as needed. Nothing at `path` changes
/// until the returned file is committed.
pub fn stage(path: &Path, bytes: &[u8]) -> VarianceResult<StagedFile> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| VarianceError::io(parent, e))?;
    }

    let staging = staging_path(path)?;
    if let Err(e) = fs::write(&staging, bytes) {
        let _ = fs::remove_file(&staging);
        return Err(VarianceError::io(&staging, e));
    }
    Ok(StagedFile {
        staging,
        target: path.to_path_buf(),
    })
}

/// Publishes every staged file, or none of them.
///
/// Files are renamed in order. If one rename fails, the files already
/// committed are put back the way they were, the remaining staged files are
/// removed, and the first error is returned.
pub fn commit_all(files: Vec<StagedFile>) -> VarianceResult<()> {
    let mut committed: Vec<(PathBuf, Option<PathBuf>)> = Vec::with_capacity(files.len());
    let mut pending = files.into_iter();

    while let Some(file) = pending.next() {
        match file.commit_with_backup() {
            Ok(backup) => committed.push((file.target.clone(), backup)),
            Err(e) => {
                file.discard();
                pending.for_each(StagedFile::discard);
                roll_back(committed);
                return Err(e);
            }
        }
    }

    for (_, backup) in committed {
        if let Some(backup) = backup {
            let _ = fs::remove_file(backup);
        }
    }
    Ok(())
}

fn roll_back(committed: Vec<(PathBuf, Option<PathBuf>)>) {
    for (target, backup) in committed.into_iter().rev() {
        match backup {
            Some(backup) => {
                let _ = fs::rename(backup, &target);
            }
            None => {
                let _ = fs::remove_file(&target);
            }
        }
    }
}

/// Writes `bytes` to a sibling staging file, then renames it over `path`.
///
/// Parent directories are created as needed. Readers of `path` see either
/// the previous contents or the new contents, never a truncated file.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> VarianceResult<()> {
    stage(path, bytes)?.commit()
}
