//! Shellmate - CLI entry point
//!
//! Thin driver over the shellmate library: it resolves the application
//! identity, then sequences register/deregister/update/status calls
//! across the selected features. Each feature succeeds or fails on its
//! own; the driver never rolls one back because another failed.

use anyhow::Result;
use clap::{Parser, Subcommand};

use shellmate::AppIdentity;

mod commands;
use commands::FeatureArg;

#[derive(Parser)]
#[command(name = "shellmate")]
#[command(about = "Toggle Windows shell integration for a desktop application")]
#[command(version)]
struct Cli {
    /// Application display name used in menu entries and registry keys
    #[arg(long, global = true, default_value = "Shellmate")]
    app_name: String,

    /// Path to the application executable (defaults to this binary)
    #[arg(long, global = true)]
    exe: Option<String>,

    /// Path to the file-type icon (defaults to resources\cli\file.ico
    /// next to the executable)
    #[arg(long, global = true)]
    icon: Option<String>,

    /// Registry key holding the recorded InstallLocation
    #[arg(long, global = true)]
    install_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show each feature's registration state
    Status {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Register shell integration features
    Register {
        /// Features to register (default: all)
        #[arg(value_enum)]
        features: Vec<FeatureArg>,
    },

    /// Deregister shell integration features
    Deregister {
        /// Features to deregister (default: all)
        #[arg(value_enum)]
        features: Vec<FeatureArg>,
    },

    /// Rewrite the registry entries of already-registered features
    Update {
        /// Features to update (default: all)
        #[arg(value_enum)]
        features: Vec<FeatureArg>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let identity = resolve_identity(&cli)?;

    match cli.command {
        Commands::Status { json } => commands::status(&identity, json),
        Commands::Register { features } => commands::register(&identity, &select(features)),
        Commands::Deregister { features } => commands::deregister(&identity, &select(features)),
        Commands::Update { features } => commands::update(&identity, &select(features)),
    }
}

/// An empty selection means every feature.
fn select(features: Vec<FeatureArg>) -> Vec<FeatureArg> {
    if features.is_empty() {
        FeatureArg::ALL.to_vec()
    } else {
        features
    }
}

fn resolve_identity(cli: &Cli) -> Result<AppIdentity> {
    let mut identity = match &cli.exe {
        Some(exe) => AppIdentity::new(&cli.app_name, exe.clone()),
        None => AppIdentity::from_current_exe(&cli.app_name)?,
    };
    if let Some(icon) = &cli.icon {
        identity.icon_path = icon.clone();
    }
    if let Some(key) = &cli.install_key {
        identity.install_key = key.clone();
    }
    Ok(identity)
}
