//! Persistence seam for the user registry.
//!
//! The engine never talks to the Windows registry directly; it goes
//! through [`RegistryStore`], which keeps the feature logic testable
//! against [`MemoryStore`] and leaves the real hive behind
//! `WindowsStore` on Windows builds.

pub mod memory;
#[cfg(windows)]
pub mod windows;

pub use memory::MemoryStore;
#[cfg(windows)]
pub use windows::WindowsStore;

use std::io;

/// Hierarchical key/value store scoped to the current user.
///
/// Keys are backslash-separated paths relative to the user hive. A
/// value name of `""` addresses a key's default value. An absent key or
/// value reads as `Ok(None)`; only genuine store failures surface as
/// errors.
pub trait RegistryStore {
    /// Read a single string value. `None` if the key or value is absent.
    fn get(&self, key: &str, name: &str) -> io::Result<Option<String>>;

    /// Create a key, including missing parents. Succeeds if the key
    /// already exists.
    fn create(&mut self, key: &str) -> io::Result<()>;

    /// Write a string value under an existing key, overwriting any
    /// previous value.
    fn set(&mut self, key: &str, name: &str, value: &str) -> io::Result<()>;

    /// Delete a key and everything nested beneath it.
    fn destroy(&mut self, key: &str) -> io::Result<()>;

    /// Enumerate all name/value pairs directly under a key.
    fn values(&self, key: &str) -> io::Result<Vec<(String, String)>>;
}
