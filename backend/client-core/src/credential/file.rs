use super::CredentialStore;

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, error, warn};

pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

#[cfg(unix)]
pub const CREDENTIALS_FILE_MODE: u32 = 0o600;

/// Credential store backed by a JSON file.
///
/// Keys are namespaced with a prefix so several stores can share one file.
/// Every operation re-reads the file; changes rewrite it with temp file + rename.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    prefix: String,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileCredentialStore {
    /// Open (or lazily create) {dir}/credentials.json.
    ///
    /// A missing or corrupt file starts as an empty store.
    pub fn open(dir: &Path, prefix: impl Into<String>) -> Self {
        let path = dir.join(CREDENTIALS_FILE_NAME);
        let entries = read_entries(&path);

        Self {
            path,
            prefix: prefix.into(),
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Lock and refresh from disk so writes by other stores are not clobbered.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if self.path.exists() {
            *entries = read_entries(&self.path);
        }
        entries
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        if let Err(e) = write_entries(&self.path, entries) {
            error!(
                "Failed to persist credentials to {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(&self.full_key(key)).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.lock();
        entries.insert(self.full_key(key), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.lock();
        if entries.remove(&self.full_key(key)).is_some() {
            self.persist(&entries);
        }
    }

    fn clear(&self) {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(&self.prefix));
        if entries.len() != before {
            self.persist(&entries);
        }
    }
}

fn read_entries(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        debug!("No credential file at {}", path.display());
        return BTreeMap::new();
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Failed to read credentials from {}: {}", path.display(), e);
            return BTreeMap::new();
        }
    };

    serde_json::from_str(&contents).unwrap_or_else(|e| {
        warn!("Credential file {} is corrupt, starting empty: {}", path.display(), e);
        BTreeMap::new()
    })
}

fn write_entries(path: &Path, entries: &BTreeMap<String, String>) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let json = serde_json::to_string_pretty(entries)?;
    let temp_path = path.with_extension("json.tmp");
    let mut file = open_private(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(&temp_path, path)
}

/// Owner read/write only: the file holds a bearer token.
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(CREDENTIALS_FILE_MODE)
        .open(path)?;
    // `mode` only applies on creation; a leftover temp file keeps its old bits.
    file.set_permissions(std::fs::Permissions::from_mode(CREDENTIALS_FILE_MODE))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
