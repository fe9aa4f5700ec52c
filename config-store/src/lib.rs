//! Persistent key-value preference store for the lighthouse CLI.
//!
//! Preferences live in a `config.toml` under the store directory, which is
//! `$LIGHTHOUSE_HOME` when set and `~/.{app_name}` otherwise. The store is a
//! flat TOML table of dynamically typed values; callers that need a specific
//! type validate on read (see [`ConfigStore::get_bool`]).

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

/// File name of the preference file inside the store directory.
pub const CONFIG_TOML_FILE: &str = "config.toml";

/// Environment variable that overrides the store directory location.
pub const LIGHTHOUSE_HOME_ENV_VAR: &str = "LIGHTHOUSE_HOME";

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the directory holding the preference file for `app_name`.
///
/// - If `LIGHTHOUSE_HOME` is set and non-empty, the value is created if
///   missing and canonicalized.
/// - Otherwise this resolves to `~/.{app_name}` without verifying that the
///   directory exists; it is created on first write.
pub fn resolve_store_dir(app_name: &str) -> std::io::Result<PathBuf> {
    if let Ok(val) = std::env::var(LIGHTHOUSE_HOME_ENV_VAR)
        && !val.is_empty()
    {
        let path = PathBuf::from(val);
        fs::create_dir_all(&path)?;
        return path.canonicalize();
    }

    let mut p = dirs::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not find home directory",
        )
    })?;
    p.push(format!(".{app_name}"));
    Ok(p)
}

/// A flat, file-backed key-value store. Reads happen once at open; every
/// `set` rewrites the file.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    table: toml::Table,
}

impl ConfigStore {
    /// Open the store for `app_name`, loading `config.toml` if it exists. A
    /// missing file is an empty store, not an error.
    pub fn open(app_name: &str) -> Result<Self, ConfigStoreError> {
        let dir = resolve_store_dir(app_name)?;
        Self::open_at(&dir)
    }

    /// Open the store rooted at an explicit directory.
    pub fn open_at(dir: &Path) -> Result<Self, ConfigStoreError> {
        let path = dir.join(CONFIG_TOML_FILE);
        let table = match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str::<toml::Table>(&contents).map_err(|source| {
                ConfigStoreError::Parse {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, table })
    }

    /// Raw read of a stored value; `None` when the key is absent.
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.table.get(key)
    }

    /// Read a stored boolean. Any non-boolean value (including absent) is
    /// treated as unset rather than as corruption.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(toml::Value::as_bool)
    }

    /// Store `value` under `key` and persist the table to disk.
    pub fn set(
        &mut self,
        key: &str,
        value: impl Into<toml::Value>,
    ) -> Result<(), ConfigStoreError> {
        self.table.insert(key.to_string(), value.into());
        self.persist()
    }

    /// Remove `key`, returning the previous value. The file is only
    /// rewritten when something was actually removed.
    pub fn remove(&mut self, key: &str) -> Result<Option<toml::Value>, ConfigStoreError> {
        let previous = self.table.remove(key);
        if previous.is_some() {
            self.persist()?;
        }
        Ok(previous)
    }

    /// Path of the backing `config.toml`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), ConfigStoreError> {
        let serialized = toml::to_string_pretty(&self.table)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash mid-write never leaves a truncated
        // preference file behind.
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, serialized)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
