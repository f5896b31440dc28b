//! In-memory registry store for tests and non-Windows development.

use std::collections::BTreeMap;
use std::io;

use super::RegistryStore;

/// Map-backed [`RegistryStore`] with optional fault injection.
///
/// Keys are stored verbatim (the real registry is case-insensitive;
/// the engine uses consistent casing, so the map does not need to be).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    keys: BTreeMap<String, BTreeMap<String, String>>,
    fail_reads: bool,
    fail_writes: bool,
    fail_key: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get`/`values` call fail.
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every subsequent `create`/`set`/`destroy` call fail.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Make writes against one specific key fail, leaving the rest of
    /// the store writable.
    pub fn fail_key(&mut self, key: impl Into<String>) {
        self.fail_key = Some(key.into());
    }

    pub fn key_exists(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Number of keys at or below `key`.
    pub fn subtree_len(&self, key: &str) -> usize {
        let prefix = format!("{key}\\");
        self.keys
            .keys()
            .filter(|k| *k == key || k.starts_with(&prefix))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn injected() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "injected store failure")
    }

    fn check_write(&self, key: &str) -> io::Result<()> {
        if self.fail_writes || self.fail_key.as_deref() == Some(key) {
            Err(Self::injected())
        } else {
            Ok(())
        }
    }
}

impl RegistryStore for MemoryStore {
    fn get(&self, key: &str, name: &str) -> io::Result<Option<String>> {
        if self.fail_reads {
            return Err(Self::injected());
        }
        Ok(self.keys.get(key).and_then(|values| values.get(name)).cloned())
    }

    fn create(&mut self, key: &str) -> io::Result<()> {
        self.check_write(key)?;
        self.keys.entry(key.to_string()).or_default();
        Ok(())
    }

    fn set(&mut self, key: &str, name: &str, value: &str) -> io::Result<()> {
        self.check_write(key)?;
        let Some(values) = self.keys.get_mut(key) else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("key not found: {key}"),
            ));
        };
        values.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn destroy(&mut self, key: &str) -> io::Result<()> {
        self.check_write(key)?;
        if self.subtree_len(key) == 0 {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("key not found: {key}"),
            ));
        }
        let prefix = format!("{key}\\");
        self.keys.retain(|k, _| k != key && !k.starts_with(&prefix));
        Ok(())
    }

    fn values(&self, key: &str) -> io::Result<Vec<(String, String)>> {
        if self.fail_reads {
            return Err(Self::injected());
        }
        Ok(self
            .keys
            .get(key)
            .map(|values| {
                values
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}
