//! Shell integration features.
//!
//! Each feature is an independent, idempotent toggle: either a set of
//! registry writes under a root key it exclusively owns
//! ([`FeatureRegistration`]) or a delegated mutation of the shared user
//! PATH ([`PathFeature`]). Features never contend on registry keys and
//! never roll each other back; a failure in one leaves the others
//! exactly as they were.

pub mod catalog;
pub mod path;
pub mod registration;

pub use catalog::{AppIdentity, FeatureStatus};
pub use path::{PathFeature, PathScript, PowerShellScript};
pub use registration::{FeatureRegistration, WriteEntry};

use serde::Serialize;

/// Outcome of a feature state query.
///
/// `Indeterminate` means the store could not be read. That is distinct
/// from a readable store with no marker entry: a caller deciding
/// whether to delete a subtree should not treat the two the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Registration {
    Registered,
    NotRegistered,
    Indeterminate,
}

impl Registration {
    /// Collapse to the boolean a caller usually wants: anything short
    /// of a confirmed marker match counts as not registered.
    pub fn is_registered(self) -> bool {
        self == Registration::Registered
    }
}
