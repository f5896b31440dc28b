//! User PATH membership, delegated to an external helper script.
//!
//! The PATH variable is shared with everything else on the machine and
//! cannot be owned the way a feature's registry subtree can. This
//! feature therefore only scans the user environment for its own
//! markers and hands the actual edit to a bundled PowerShell script,
//! accepting last-writer-wins semantics on the variable itself.
//!
//! Only the user scope is managed. The script also supports a machine
//! install mode, but editing the machine PATH needs an elevated
//! context and there is no reliable way to confirm elevation at query
//! time, so that mode is never requested from here.

use std::process::Command;

use tracing::{debug, warn};

use crate::error::ShellError;
use crate::store::RegistryStore;

use super::Registration;

/// The user environment key.
const USER_ENV_KEY: &str = "Environment";

/// The machine-wide environment key. Documented for completeness; see
/// the module docs for why it is never written.
#[allow(dead_code)]
const SYSTEM_ENV_KEY: &str = "SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Environment";

/// Location of the PATH helper inside the install directory.
const SCRIPT_RELATIVE_PATH: &str = "resources\\modify-windows-path.ps1";

/// Value under the install key recording the install directory.
const INSTALL_LOCATION: &str = "InstallLocation";

/// Runs the external PATH-mutation helper.
///
/// A seam so the feature logic can be tested without spawning a real
/// process or touching the real environment.
pub trait PathScript {
    /// Add (`remove = false`) or remove (`remove = true`) the install
    /// directory from the user PATH.
    fn apply(&self, install_dir: &str, remove: bool) -> Result<(), ShellError>;
}

/// [`PathScript`] backed by `powershell.exe` running the bundled
/// helper. Success and failure come from the exit status and captured
/// stderr; stdout is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct PowerShellScript;

impl PathScript for PowerShellScript {
    fn apply(&self, install_dir: &str, remove: bool) -> Result<(), ShellError> {
        let script = format!("{install_dir}\\{SCRIPT_RELATIVE_PATH}");
        let output = Command::new("powershell.exe")
            .args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-File", &script])
            .args(["-installMode", "User"])
            .arg("-installdir")
            .arg(format!("\"{install_dir}\""))
            .args(["-remove", if remove { "1" } else { "0" }])
            .output()
            .map_err(|source| ShellError::ScriptLaunch { source })?;
        if output.status.success() {
            Ok(())
        } else {
            Err(ShellError::ScriptFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// PATH membership feature for the current user.
#[derive(Debug, Clone)]
pub struct PathFeature {
    install_key: String,
    markers: Vec<String>,
}

impl PathFeature {
    /// `install_key` is where the installer recorded
    /// `InstallLocation`; `markers` are the substrings whose presence
    /// in the user `Path` value counts as installed.
    pub fn new(install_key: impl Into<String>, markers: Vec<String>) -> Self {
        Self {
            install_key: install_key.into(),
            markers,
        }
    }

    pub fn name(&self) -> &str {
        "path"
    }

    /// Scan the user environment for any marker substring.
    ///
    /// The `Path` value may carry any number of unrelated entries; this
    /// is a membership check, not an exact comparison, and it tolerates
    /// other software rewriting the variable at any time.
    pub fn registration(&self, store: &impl RegistryStore) -> Registration {
        let items = match store.values(USER_ENV_KEY) {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "could not enumerate user environment");
                return Registration::Indeterminate;
            }
        };
        for (name, value) in &items {
            // Registry value names are case-insensitive.
            if name.eq_ignore_ascii_case("Path")
                && self.markers.iter().any(|marker| value.contains(marker.as_str()))
            {
                return Registration::Registered;
            }
        }
        Registration::NotRegistered
    }

    pub fn is_registered(&self, store: &impl RegistryStore) -> bool {
        self.registration(store).is_registered()
    }

    /// The install directory recorded by the installer.
    pub fn install_path(&self, store: &impl RegistryStore) -> Result<String, ShellError> {
        let value = store
            .get(&self.install_key, INSTALL_LOCATION)
            .map_err(|source| ShellError::StoreRead {
                key: self.install_key.clone(),
                name: INSTALL_LOCATION.to_string(),
                source,
            })?;
        match value {
            Some(path) if !path.is_empty() => Ok(path),
            _ => Err(ShellError::MissingInstallPath {
                key: self.install_key.clone(),
            }),
        }
    }

    /// Add the install directory to the user PATH.
    ///
    /// Fails before any subprocess is launched when the install path
    /// cannot be resolved.
    pub fn register(
        &self,
        store: &impl RegistryStore,
        script: &impl PathScript,
    ) -> Result<(), ShellError> {
        let dir = self.install_path(store)?;
        debug!(%dir, "adding install directory to user PATH");
        script.apply(&dir, false)
    }

    /// Remove the install directory from the user PATH. When the PATH
    /// carries none of our markers this is a reported no-op and no
    /// subprocess is launched.
    pub fn deregister(
        &self,
        store: &impl RegistryStore,
        script: &impl PathScript,
    ) -> Result<bool, ShellError> {
        if !self.registration(store).is_registered() {
            return Ok(false);
        }
        let dir = self.install_path(store)?;
        debug!(%dir, "removing install directory from user PATH");
        script.apply(&dir, true)?;
        Ok(true)
    }
}
