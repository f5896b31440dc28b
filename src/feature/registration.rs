//! Registry-backed feature registration engine.

use std::io;

use tracing::{debug, warn};

use crate::error::ShellError;
use crate::store::RegistryStore;

use super::Registration;

/// One registry value write belonging to a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteEntry {
    /// Key path below the feature root; `None` writes at the root itself.
    pub subkey: Option<String>,
    /// Value name; `""` addresses the key's default value.
    pub name: String,
    pub value: String,
}

impl WriteEntry {
    pub fn new(subkey: Option<&str>, name: &str, value: impl Into<String>) -> Self {
        Self {
            subkey: subkey.map(str::to_string),
            name: name.to_string(),
            value: value.into(),
        }
    }

    fn key_under(&self, root: &str) -> String {
        match &self.subkey {
            Some(subkey) => format!("{root}\\{subkey}"),
            None => root.to_string(),
        }
    }
}

/// A shell integration feature expressed as value writes under one
/// registry subtree.
///
/// The first entry in `parts` is the canonical marker: `registration`
/// and `update` consult only that entry, treating "the marker holds
/// exactly the value we would write" as registered. The remaining
/// entries are written but never verified.
#[derive(Debug, Clone)]
pub struct FeatureRegistration {
    name: String,
    root_key: String,
    parts: Vec<WriteEntry>,
}

impl FeatureRegistration {
    /// `parts` must be non-empty; its first entry becomes the marker.
    ///
    /// # Panics
    ///
    /// Panics on an empty `parts` list. Features are built from static
    /// configuration at startup, so an empty list is a programming
    /// error, not a runtime condition to recover from.
    pub fn new(
        name: impl Into<String>,
        root_key: impl Into<String>,
        parts: Vec<WriteEntry>,
    ) -> Self {
        assert!(!parts.is_empty(), "a feature needs at least a marker entry");
        Self {
            name: name.into(),
            root_key: root_key.into(),
            parts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    fn marker(&self) -> &WriteEntry {
        &self.parts[0]
    }

    /// Query the marker entry.
    pub fn registration(&self, store: &impl RegistryStore) -> Registration {
        let marker = self.marker();
        let key = marker.key_under(&self.root_key);
        match store.get(&key, &marker.name) {
            Ok(Some(value)) if value == marker.value => Registration::Registered,
            Ok(_) => Registration::NotRegistered,
            Err(err) => {
                warn!(feature = %self.name, %key, error = %err, "marker read failed");
                Registration::Indeterminate
            }
        }
    }

    pub fn is_registered(&self, store: &impl RegistryStore) -> bool {
        self.registration(store).is_registered()
    }

    /// Write every entry under the root key.
    ///
    /// All writes are attempted even when one fails; failures are
    /// collected into a single [`ShellError::PartialWrite`] and entries
    /// that succeeded stay written. Registering an already registered
    /// feature rewrites the same values and is an effective no-op.
    pub fn register(&self, store: &mut impl RegistryStore) -> Result<(), ShellError> {
        let mut failures: Vec<(String, io::Error)> = Vec::new();
        for part in &self.parts {
            let key = part.key_under(&self.root_key);
            let written = store
                .create(&key)
                .and_then(|()| store.set(&key, &part.name, &part.value));
            if let Err(err) = written {
                warn!(feature = %self.name, %key, error = %err, "entry write failed");
                failures.push((key, err));
            }
        }
        if failures.is_empty() {
            debug!(feature = %self.name, entries = self.parts.len(), "registered");
            Ok(())
        } else {
            Err(ShellError::PartialWrite {
                feature: self.name.clone(),
                total: self.parts.len(),
                failures,
            })
        }
    }

    /// Remove the feature's whole subtree, but only when the marker
    /// confirms the feature is registered. Returns whether anything was
    /// removed; deregistering an unregistered feature is a reported
    /// no-op, and an indeterminate state never triggers a delete.
    pub fn deregister(&self, store: &mut impl RegistryStore) -> Result<bool, ShellError> {
        if !self.registration(store).is_registered() {
            return Ok(false);
        }
        store
            .destroy(&self.root_key)
            .map_err(|source| ShellError::StoreDestroy {
                key: self.root_key.clone(),
                source,
            })?;
        debug!(feature = %self.name, key = %self.root_key, "deregistered");
        Ok(true)
    }

    /// Rewrite every entry for a feature that is already present,
    /// refreshing stale values after configuration changed (say, the
    /// executable moved). Updating must not create a feature the user
    /// never enabled, so an absent marker is an error and a failed
    /// marker read is propagated rather than written over.
    pub fn update(&self, store: &mut impl RegistryStore) -> Result<(), ShellError> {
        let marker = self.marker();
        let key = marker.key_under(&self.root_key);
        match store.get(&key, &marker.name) {
            Ok(Some(_)) => self.register(store),
            Ok(None) => Err(ShellError::NotRegistered {
                feature: self.name.clone(),
            }),
            Err(source) => Err(ShellError::StoreRead {
                key,
                name: marker.name.clone(),
                source,
            }),
        }
    }
}
