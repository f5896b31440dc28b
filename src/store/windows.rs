//! `HKEY_CURRENT_USER` store backed by the winreg crate.

use std::io;

use winreg::enums::{HKEY_CURRENT_USER, KEY_READ, KEY_SET_VALUE};
use winreg::types::FromRegValue;
use winreg::RegKey;

use super::RegistryStore;

/// [`RegistryStore`] over the current user's hive.
///
/// All features in this crate are per-user by design, so the hive is
/// fixed rather than configurable.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsStore;

impl WindowsStore {
    pub fn new() -> Self {
        Self
    }
}

fn is_not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

impl RegistryStore for WindowsStore {
    fn get(&self, key: &str, name: &str) -> io::Result<Option<String>> {
        let subkey = match RegKey::predef(HKEY_CURRENT_USER).open_subkey_with_flags(key, KEY_READ) {
            Ok(subkey) => subkey,
            Err(err) if is_not_found(&err) => return Ok(None),
            Err(err) => return Err(err),
        };
        match subkey.get_value::<String, _>(name) {
            Ok(value) => Ok(Some(value)),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn create(&mut self, key: &str) -> io::Result<()> {
        RegKey::predef(HKEY_CURRENT_USER)
            .create_subkey(key)
            .map(|_| ())
    }

    fn set(&mut self, key: &str, name: &str, value: &str) -> io::Result<()> {
        RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey_with_flags(key, KEY_SET_VALUE)?
            .set_value(name, &value)
    }

    fn destroy(&mut self, key: &str) -> io::Result<()> {
        RegKey::predef(HKEY_CURRENT_USER).delete_subkey_all(key)
    }

    fn values(&self, key: &str) -> io::Result<Vec<(String, String)>> {
        let subkey = match RegKey::predef(HKEY_CURRENT_USER).open_subkey_with_flags(key, KEY_READ) {
            Ok(subkey) => subkey,
            // An absent key has no values; only real failures propagate
            Err(err) if is_not_found(&err) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let mut pairs = Vec::new();
        for item in subkey.enum_values() {
            let (name, raw) = item?;
            // REG_EXPAND_SZ is common for Path; fall back to the raw
            // rendering for non-string kinds.
            let value = String::from_reg_value(&raw).unwrap_or_else(|_| raw.to_string());
            pairs.push((name, value));
        }
        Ok(pairs)
    }
}
