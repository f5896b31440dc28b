//! CLI command handlers.
//!
//! Handlers only sequence library calls. Features are processed
//! independently: one feature's failure is printed and counted, and
//! the run continues with the rest, exiting non-zero at the end if
//! anything failed.

use anyhow::Result;

use shellmate::feature::catalog;
use shellmate::{AppIdentity, FeatureRegistration, PowerShellScript, Registration};

/// Selectable shell integration features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FeatureArg {
    /// File-type association handler
    FileHandler,
    /// Right-click menu on files
    FileMenu,
    /// Right-click menu on folders
    FolderMenu,
    /// Right-click menu on folder backgrounds
    FolderBackgroundMenu,
    /// Install directory on the user PATH
    Path,
}

impl FeatureArg {
    pub const ALL: [FeatureArg; 5] = [
        FeatureArg::FileHandler,
        FeatureArg::FileMenu,
        FeatureArg::FolderMenu,
        FeatureArg::FolderBackgroundMenu,
        FeatureArg::Path,
    ];

    /// The registry-backed feature this argument selects, or `None`
    /// for the PATH feature.
    fn registry_feature(self, identity: &AppIdentity) -> Option<FeatureRegistration> {
        match self {
            FeatureArg::FileHandler => Some(catalog::file_handler(identity)),
            FeatureArg::FileMenu => Some(catalog::file_context_menu(identity)),
            FeatureArg::FolderMenu => Some(catalog::folder_context_menu(identity)),
            FeatureArg::FolderBackgroundMenu => {
                Some(catalog::folder_background_context_menu(identity))
            }
            FeatureArg::Path => None,
        }
    }
}

#[cfg(windows)]
fn open_store() -> Result<shellmate::store::WindowsStore> {
    Ok(shellmate::store::WindowsStore::new())
}

#[cfg(not(windows))]
fn open_store() -> Result<shellmate::MemoryStore> {
    anyhow::bail!("shell integration is only available on Windows")
}

fn state_label(state: Registration) -> &'static str {
    match state {
        Registration::Registered => "registered",
        Registration::NotRegistered => "not registered",
        Registration::Indeterminate => "indeterminate (store read failed)",
    }
}

/// Show each feature's registration state.
#[cfg(not(tarpaulin_include))]
pub fn status(identity: &AppIdentity, json: bool) -> Result<()> {
    let store = open_store()?;
    let rows = catalog::feature_statuses(identity, &store);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in &rows {
            println!("{:<24} {}", row.feature, state_label(row.state));
        }
    }
    Ok(())
}

/// Register the selected features, independently.
#[cfg(not(tarpaulin_include))]
pub fn register(identity: &AppIdentity, features: &[FeatureArg]) -> Result<()> {
    let mut store = open_store()?;
    let script = PowerShellScript;
    let mut failed = 0usize;

    for arg in features {
        match arg.registry_feature(identity) {
            Some(feature) => match feature.register(&mut store) {
                Ok(()) => println!("registered {}", feature.name()),
                Err(err) => {
                    failed += 1;
                    eprintln!("{}: {err}", feature.name());
                }
            },
            None => {
                let path = catalog::path_feature(identity);
                match path.register(&store, &script) {
                    Ok(()) => println!("registered path"),
                    Err(err) => {
                        failed += 1;
                        eprintln!("path: {err}");
                    }
                }
            }
        }
    }
    finish(failed)
}

/// Deregister the selected features, independently.
#[cfg(not(tarpaulin_include))]
pub fn deregister(identity: &AppIdentity, features: &[FeatureArg]) -> Result<()> {
    let mut store = open_store()?;
    let script = PowerShellScript;
    let mut failed = 0usize;

    for arg in features {
        match arg.registry_feature(identity) {
            Some(feature) => match feature.deregister(&mut store) {
                Ok(true) => println!("deregistered {}", feature.name()),
                Ok(false) => println!("{} was not registered", feature.name()),
                Err(err) => {
                    failed += 1;
                    eprintln!("{}: {err}", feature.name());
                }
            },
            None => {
                let path = catalog::path_feature(identity);
                match path.deregister(&store, &script) {
                    Ok(true) => println!("deregistered path"),
                    Ok(false) => println!("path was not registered"),
                    Err(err) => {
                        failed += 1;
                        eprintln!("path: {err}");
                    }
                }
            }
        }
    }
    finish(failed)
}

/// Rewrite the entries of the selected, already-registered features.
/// The PATH feature has no stored entries of its own to refresh, so it
/// is skipped with a notice when selected.
#[cfg(not(tarpaulin_include))]
pub fn update(identity: &AppIdentity, features: &[FeatureArg]) -> Result<()> {
    let mut store = open_store()?;
    let mut failed = 0usize;

    for arg in features {
        match arg.registry_feature(identity) {
            Some(feature) => match feature.update(&mut store) {
                Ok(()) => println!("updated {}", feature.name()),
                Err(err) => {
                    failed += 1;
                    eprintln!("{}: {err}", feature.name());
                }
            },
            None => println!("path: nothing to update (managed by the PATH helper)"),
        }
    }
    finish(failed)
}

fn finish(failed: usize) -> Result<()> {
    if failed > 0 {
        anyhow::bail!("{failed} feature(s) failed");
    }
    Ok(())
}
