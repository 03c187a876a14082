//! Advisory file lock guarding the production slot and the ledger.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fd_lock::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::Result;

/// Cross-process lock over a lock file
///
/// Promotion and rollback take the exclusive side for their whole
/// read-parent, stage, swap, append sequence. Readers take the shared side.
/// Guards release on drop.
#[derive(Debug)]
pub struct SlotLock {
    lock: RwLock<File>,
    path: PathBuf,
}

impl SlotLock {
    /// Open (creating if needed) the lock file
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).truncate(false).read(true).write(true).open(path)?;
        Ok(Self { lock: RwLock::new(file), path: path.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the exclusive lock is held
    pub fn write(&mut self) -> Result<RwLockWriteGuard<'_, File>> {
        tracing::trace!(path = %self.path.display(), "acquiring exclusive lifecycle lock");
        Ok(self.lock.write()?)
    }

    /// Block until the shared lock is held
    pub fn read(&self) -> Result<RwLockReadGuard<'_, File>> {
        Ok(self.lock.read()?)
    }

    /// Exclusive lock without blocking; `None` if someone else holds it
    pub fn try_write(&mut self) -> Result<Option<RwLockWriteGuard<'_, File>>> {
        match self.lock.try_write() {
            Ok(guard) => Ok(Some(guard)),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
