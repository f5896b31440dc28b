//! Shellmate library
//!
//! Windows shell integration for a desktop application: file-type
//! association, right-click context menus, and user PATH membership.
//! Each integration point is a named, idempotent feature that can be
//! queried, registered, and deregistered independently.

pub mod error;
pub mod feature;
pub mod store;

pub use error::ShellError;
pub use feature::catalog::AppIdentity;
pub use feature::{
    FeatureRegistration, PathFeature, PathScript, PowerShellScript, Registration, WriteEntry,
};
pub use store::{MemoryStore, RegistryStore};
