use std::env;
use std::path::{Path, PathBuf};

use crate::error::{HrrError, Result};

/// Scoped working-directory change. The process working directory is global
/// mutable state; the guard restores the previous directory when dropped,
/// on success and failure paths alike.
#[derive(Debug)]
pub struct WorkDir {
    prev: PathBuf,
}

impl WorkDir {
    pub fn enter(dir: &Path) -> Result<Self> {
        let prev = env::current_dir().map_err(|e| HrrError::Io {
            path: PathBuf::from("."),
            source: e,
        })?;
        env::set_current_dir(dir).map_err(|e| HrrError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        Ok(WorkDir { prev })
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        // Nothing sane to do if restoration fails mid-unwind.
        let _ = env::set_current_dir(&self.prev);
    }
}

// The working directory is process-wide; tests that touch it must not run
// concurrently with each other.
#[cfg(test)]
pub(crate) static CWD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
