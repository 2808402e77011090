//! Directory backed parameter store.
//!
//! Every key is its own file holding the raw value:
//!
//! ```text
//! ~/.config/slc/params/
//! ├── IsMetric              0
//! ├── Offset1               0
//! ├── SLCPriority1          Dashboard
//! └── PreviousSpeedLimit    20.1168
//! ```
//!
//! Keys never share a file, so writers touching different keys cannot lose
//! each other's updates. Each write goes to a uniquely named temp file in
//! the same directory and is renamed over the key's file, so a concurrent
//! reader sees either the old or the new value, never a partial one.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{ParamStore, ParamsError, ParamsResult};

/// Directory name used under the platform config / shared memory dirs.
const APP_DIR: &str = "slc";

/// Prefix of in-flight temp files; never a valid key.
const TEMP_PREFIX: &str = ".tmp";

/// Default location of the persistent store.
///
/// `~/.config/slc/params` on Linux, falling back to the temp dir when the
/// platform has no config directory.
pub fn default_params_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join("params")
}

/// Default location of the live store.
///
/// Uses `/dev/shm` when available so values never touch disk.
pub fn default_live_path() -> PathBuf {
    let shm = Path::new("/dev/shm");
    let base = if shm.is_dir() {
        shm.to_path_buf()
    } else {
        std::env::temp_dir()
    };
    base.join(APP_DIR).join("live")
}

/// Parameter store keeping one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileParamStore {
    dir: PathBuf,
}

impl FileParamStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store at [`default_params_path`].
    pub fn persistent() -> Self {
        Self::new(default_params_path())
    }

    /// Store at [`default_live_path`].
    pub fn live() -> Self {
        Self::new(default_live_path())
    }

    /// Directory holding the key files.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`, `None` for names that are not plain file names.
    fn key_path(&self, key: &str) -> Option<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && !key.contains(|c: char| matches!(c, '/' | '\\' | '\0'));
        valid.then(|| self.dir.join(key))
    }

    fn checked_key_path(&self, key: &str) -> ParamsResult<PathBuf> {
        self.key_path(key).ok_or_else(|| ParamsError::InvalidKey {
            key: key.to_string(),
        })
    }
}

impl ParamStore for FileParamStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Unreadable parameter");
                None
            }
        }
    }

    fn put(&self, key: &str, value: &str) -> ParamsResult<()> {
        let path = self.checked_key_path(key)?;
        let dir_err = |source| ParamsError::Io {
            path: self.dir.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(dir_err)?;
        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.dir)
            .map_err(dir_err)?;

        if let Err(source) = write_value(&mut tmp, value) {
            return Err(ParamsError::Io {
                path: tmp.path().to_path_buf(),
                source,
            });
        }
        tmp.persist(&path)
            .map_err(|e| ParamsError::Io { path, source: e.error })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> ParamsResult<()> {
        let path = self.checked_key_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ParamsError::Io { path, source }),
        }
    }

    fn keys(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut keys: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| self.key_path(name).is_some())
            .collect();
        keys.sort();
        keys
    }
}

fn write_value(tmp: &mut NamedTempFile, value: &str) -> std::io::Result<()> {
    tmp.write_all(value.as_bytes())?;
    tmp.as_file().sync_all()
}
