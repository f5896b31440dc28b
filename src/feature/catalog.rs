//! Stock feature definitions built from the application identity.
//!
//! One [`FeatureRegistration`] per shell integration point (file
//! handler, file context menu, folder context menu, folder background
//! context menu) plus the user PATH feature. Each registry feature owns
//! a disjoint root subtree.

use serde::Serialize;

use crate::store::RegistryStore;

use super::path::PathFeature;
use super::registration::{FeatureRegistration, WriteEntry};
use super::Registration;

/// Static configuration every feature is built from. Constructed once
/// at startup and never mutated afterwards.
///
/// Paths are kept as strings: they name locations on the target
/// Windows machine and end up verbatim in registry command values, so
/// host-platform path semantics never apply to them.
#[derive(Debug, Clone)]
pub struct AppIdentity {
    /// Display name used in menu entries and as the context-menu key.
    pub app_name: String,
    /// Full path to the application executable.
    pub exe_path: String,
    /// Full path to the file-type icon.
    pub icon_path: String,
    /// Registry key whose `InstallLocation` value records the install
    /// directory.
    pub install_key: String,
}

impl AppIdentity {
    /// Resolve from the running executable. The icon ships next to the
    /// binary under `resources\cli\file.ico`, and the install key is
    /// the application's own uninstall entry.
    pub fn from_current_exe(app_name: &str) -> std::io::Result<Self> {
        let exe_path = std::env::current_exe()?;
        Ok(Self::new(app_name, exe_path.display().to_string()))
    }

    pub fn new(app_name: &str, exe_path: impl Into<String>) -> Self {
        let exe_path = exe_path.into();
        let icon_path = match parent_dir(&exe_path) {
            Some(dir) => format!("{dir}\\resources\\cli\\file.ico"),
            None => "resources\\cli\\file.ico".to_string(),
        };
        Self {
            app_name: app_name.to_string(),
            exe_path,
            icon_path,
            install_key: format!(
                "Software\\Microsoft\\Windows\\CurrentVersion\\Uninstall\\{app_name}"
            ),
        }
    }

    /// Executable file name, the leaf of `exe_path`.
    pub fn exe_name(&self) -> &str {
        file_name(&self.exe_path)
    }

    fn quoted_exe(&self) -> String {
        quote(&self.exe_path)
    }
}

fn parent_dir(path: &str) -> Option<&str> {
    path.rfind(|c| c == '\\' || c == '/').map(|idx| &path[..idx])
}

fn file_name(path: &str) -> &str {
    match path.rfind(|c| c == '\\' || c == '/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Quote a path for use inside a registry command value, where spaces
/// are common.
fn quote(path: &str) -> String {
    format!("\"{path}\"")
}

/// File-type association handler under `Software\Classes\Applications`.
pub fn file_handler(identity: &AppIdentity) -> FeatureRegistration {
    FeatureRegistration::new(
        "file-handler",
        format!("Software\\Classes\\Applications\\{}", identity.exe_name()),
        vec![
            WriteEntry::new(
                Some("shell\\open\\command"),
                "",
                format!("{} \"%1\"", identity.quoted_exe()),
            ),
            WriteEntry::new(Some("shell\\open"), "FriendlyAppName", identity.app_name.clone()),
            WriteEntry::new(Some("DefaultIcon"), "", quote(&identity.icon_path)),
        ],
    )
}

/// The three context-menu entries share a shape; only the placeholder
/// the shell substitutes for the clicked target differs (`%1` for
/// files and folders, `%V` for a folder window's background).
fn context_menu_parts(identity: &AppIdentity, placeholder: &str) -> Vec<WriteEntry> {
    vec![
        WriteEntry::new(
            Some("command"),
            "",
            format!("{} \"{placeholder}\"", identity.quoted_exe()),
        ),
        WriteEntry::new(None, "", format!("Open with {}", identity.app_name)),
        WriteEntry::new(None, "Icon", identity.quoted_exe()),
    ]
}

/// Right-click entry on files.
pub fn file_context_menu(identity: &AppIdentity) -> FeatureRegistration {
    FeatureRegistration::new(
        "file-menu",
        format!("Software\\Classes\\*\\shell\\{}", identity.app_name),
        context_menu_parts(identity, "%1"),
    )
}

/// Right-click entry on folders.
pub fn folder_context_menu(identity: &AppIdentity) -> FeatureRegistration {
    FeatureRegistration::new(
        "folder-menu",
        format!("Software\\Classes\\Directory\\shell\\{}", identity.app_name),
        context_menu_parts(identity, "%1"),
    )
}

/// Right-click entry on the background of an open folder window.
pub fn folder_background_context_menu(identity: &AppIdentity) -> FeatureRegistration {
    FeatureRegistration::new(
        "folder-background-menu",
        format!(
            "Software\\Classes\\Directory\\background\\shell\\{}",
            identity.app_name
        ),
        context_menu_parts(identity, "%V"),
    )
}

/// Every registry-backed feature, in registration order.
pub fn registry_features(identity: &AppIdentity) -> Vec<FeatureRegistration> {
    vec![
        file_handler(identity),
        file_context_menu(identity),
        folder_context_menu(identity),
        folder_background_context_menu(identity),
    ]
}

/// The user PATH feature. Markers match the install layout the PATH
/// helper writes, so a scan of the `Path` value can recognize our own
/// entries among unrelated ones.
pub fn path_feature(identity: &AppIdentity) -> PathFeature {
    let app = &identity.app_name;
    PathFeature::new(
        identity.install_key.clone(),
        vec![
            format!("{app}\\resources"),
            format!("{app}\\resources\\app\\bin"),
        ],
    )
}

/// Registration state of one configured feature, as reported by
/// `status` (and serialized for its JSON output).
#[derive(Debug, Clone, Serialize)]
pub struct FeatureStatus {
    pub feature: String,
    pub state: Registration,
}

/// Query every configured feature, in catalog order, with the PATH
/// feature last.
pub fn feature_statuses(
    identity: &AppIdentity,
    store: &impl RegistryStore,
) -> Vec<FeatureStatus> {
    let mut rows: Vec<FeatureStatus> = registry_features(identity)
        .iter()
        .map(|feature| FeatureStatus {
            feature: feature.name().to_string(),
            state: feature.registration(store),
        })
        .collect();
    let path = path_feature(identity);
    rows.push(FeatureStatus {
        feature: path.name().to_string(),
        state: path.registration(store),
    });
    rows
}
