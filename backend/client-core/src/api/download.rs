//! Materializing downloaded bytes.
//!
//! A [`DownloadTarget`] mirrors the object-URL dance of a browser: create a
//! temporary object for the bytes, trigger the save, release the object.
//! [`ObjectGuard`] releases on drop so the release runs exactly once on every
//! path, including a failed save.

use std::collections::HashMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};
use tempfile::NamedTempFile;
use uuid::Uuid;

pub const DEFAULT_DOWNLOAD_NAME: &str = "download";

/// Handle to a temporary downloadable object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn generate() -> Self {
        ObjectUrl(format!("blob:{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait DownloadTarget: Send + Sync {
    /// Hold `bytes` in a temporary object.
    fn create_object(&self, bytes: &[u8]) -> std::io::Result<ObjectUrl>;

    /// Save the object under `filename`. Returns where it ended up.
    fn trigger_save(&self, object: &ObjectUrl, filename: &str) -> std::io::Result<PathBuf>;

    /// Free the temporary object. Called exactly once per created object.
    fn release(&self, object: &ObjectUrl);
}

/// Releases its object when dropped.
pub struct ObjectGuard<'a> {
    target: &'a dyn DownloadTarget,
    object: ObjectUrl,
}

impl<'a> ObjectGuard<'a> {
    pub fn new(target: &'a dyn DownloadTarget, object: ObjectUrl) -> Self {
        Self { target, object }
    }

    pub fn object(&self) -> &ObjectUrl {
        &self.object
    }
}

impl Drop for ObjectGuard<'_> {
    fn drop(&mut self) {
        self.target.release(&self.object);
    }
}

/// Saves downloads into a directory, staging them in temp files.
#[derive(Debug)]
pub struct FileDownloadTarget {
    dir: PathBuf,
    staged: Mutex<HashMap<ObjectUrl, NamedTempFile>>,
}

impl FileDownloadTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            staged: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of staged objects not yet released.
    pub fn staged_count(&self) -> usize {
        self.staged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl DownloadTarget for FileDownloadTarget {
    fn create_object(&self, bytes: &[u8]) -> std::io::Result<ObjectUrl> {
        std::fs::create_dir_all(&self.dir)?;
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(bytes)?;
        staged.flush()?;

        let object = ObjectUrl::generate();
        debug!("Staged {} bytes as {}", bytes.len(), object);
        self.staged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(object.clone(), staged);
        Ok(object)
    }

    fn trigger_save(&self, object: &ObjectUrl, filename: &str) -> std::io::Result<PathBuf> {
        let staged = self.staged.lock().unwrap_or_else(PoisonError::into_inner);
        let source = staged.get(object).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{object} was already released"),
            )
        })?;

        let (destination, mut file) = create_unique(&self.dir, &safe_file_name(filename))?;
        let written = File::open(source.path())
            .and_then(|mut staged_file| std::io::copy(&mut staged_file, &mut file))
            .and_then(|_| file.sync_all());
        if let Err(e) = written {
            drop(file);
            // A partial file under the user's chosen name is worse than none.
            let _ = std::fs::remove_file(&destination);
            return Err(e);
        }
        info!("Download saved to {}", destination.display());
        Ok(destination)
    }

    fn release(&self, object: &ObjectUrl) {
        let removed = self
            .staged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(object);
        match removed {
            Some(staged) => {
                if let Err(e) = staged.close() {
                    warn!("Failed to remove staged download {}: {}", object, e);
                }
            }
            None => warn!("Release of unknown object {}", object),
        }
    }
}

/// Cap on `name (n).ext` attempts before giving up.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Create `dir/name`, or `dir/stem (n).ext` when that name is taken.
///
/// Existing files are never overwritten.
fn create_unique(dir: &Path, name: &str) -> std::io::Result<(PathBuf, File)> {
    let original = Path::new(name);
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let extension = original
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()));

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let candidate = match attempt {
            0 => dir.join(name),
            n => dir.join(format!("{stem} ({n}){}", extension.as_deref().unwrap_or(""))),
        };
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        format!("no free file name for '{name}' in {}", dir.display()),
    ))
}

/// Last path component only, so a server-chosen name cannot escape the target dir.
pub fn safe_file_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty() && name != "." && name != "..")
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string())
}
