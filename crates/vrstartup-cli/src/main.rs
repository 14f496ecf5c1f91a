//! vrstartup CLI - register executables to start with the VR runtime.
//!
//! Writes an application manifest next to the executable, registers it with
//! the runtime's application catalog and enables auto-launch, streaming
//! progress as it goes.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use vrstartup_config::Config;

mod commands;
mod config_bridge;
mod theme;

use commands::{config, doctor, kill_runtime, manifest, register};

/// vrstartup - start applications together with the VR runtime
#[derive(Parser)]
#[command(name = "vrstartup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Additional configuration file, applied over the user config
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register an executable and enable auto-launch for it
    Register {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Print the manifest for an executable without contacting the runtime
    Manifest {
        #[command(flatten)]
        target: TargetArgs,

        /// Also write the manifest next to the executable
        #[arg(long)]
        write: bool,
    },

    /// Force-terminate the VR runtime's processes
    KillRuntime {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Check configuration and runtime availability
    Doctor,

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved configuration with value sources
    Show {
        /// Output format: toml or json
        #[arg(long, default_value = "toml")]
        format: String,
    },
    /// Show which config files are read
    Paths,
}

/// The executable to register and how to present it.
#[derive(Args, Debug, Clone)]
pub(crate) struct TargetArgs {
    /// Path to the executable
    pub(crate) executable: PathBuf,

    /// Display name (defaults to the executable's file name, title-cased)
    #[arg(short, long)]
    pub(crate) name: Option<String>,

    /// Register as a dashboard overlay
    #[arg(long, conflicts_with = "no_overlay")]
    pub(crate) overlay: bool,

    /// Register as a regular application
    #[arg(long)]
    pub(crate) no_overlay: bool,
}

impl TargetArgs {
    /// Overlay flag from the command line, else `default`.
    pub(crate) fn is_overlay(&self, default: bool) -> bool {
        if self.overlay {
            true
        } else if self.no_overlay {
            false
        } else {
            default
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(cli.config.as_deref());

    let log_config =
        config_bridge::to_log_config(loaded.as_ref().ok().map(|r| &r.config), cli.verbose);
    if let Err(e) = vrstartup_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Register { target } => {
            let config = loaded?.config;
            if !register::run_register(&config, &target).await? {
                std::process::exit(1);
            }
        },
        Commands::Manifest { target, write } => {
            let config = loaded?.config;
            manifest::run_manifest(&config, &target, write)?;
        },
        Commands::KillRuntime { yes } => {
            kill_runtime::run_kill_runtime(yes)?;
        },
        Commands::Doctor => {
            doctor::run_doctor(loaded);
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { format } => config::show_config(loaded?, &format)?,
            ConfigCommands::Paths => config::show_paths(cli.config.as_deref())?,
        },
    }

    Ok(())
}
