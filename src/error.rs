//! Errors surfaced by shell integration operations.
//!
//! Nothing here is fatal to the host process: every operation reports
//! its failure to the caller, which decides whether to retry, skip the
//! feature, or abort the installer step. No operation retries on its
//! own.

use std::io;

/// Errors that can occur while querying, registering, or deregistering
/// a shell integration feature.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// A read against the registry store failed. An absent key or value
    /// is not this error; it reads as a normal "not present" outcome.
    #[error("failed to read {key}\\{name}: {source}")]
    StoreRead {
        key: String,
        name: String,
        #[source]
        source: io::Error,
    },

    /// A key-subtree delete failed.
    #[error("failed to remove {key}: {source}")]
    StoreDestroy {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Some of a feature's entries could not be written. Entries that
    /// succeeded stay written; each failure is listed by target key.
    #[error("{feature}: {} of {total} entries failed to register", failures.len())]
    PartialWrite {
        feature: String,
        total: usize,
        failures: Vec<(String, io::Error)>,
    },

    /// `update` was called for a feature whose marker entry is absent.
    /// Updating never creates a feature that was not registered first.
    #[error("{feature} is not registered")]
    NotRegistered { feature: String },

    /// The installer never recorded an install directory, or recorded
    /// an empty one. PATH mutation cannot proceed without it.
    #[error("no install location recorded under {key}")]
    MissingInstallPath { key: String },

    /// The PATH helper process could not be launched.
    #[error("failed to launch PATH helper: {source}")]
    ScriptLaunch {
        #[source]
        source: io::Error,
    },

    /// The PATH helper ran but exited with failure.
    #[error("PATH helper exited with {status}: {stderr}")]
    ScriptFailed { status: String, stderr: String },
}
