// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! `ggdeploy`: a CLI client for `ggdeploymentd`'s local IPC socket (§10.3).
//! Submits local deployments and queries daemon status; every subcommand
//! connects fresh, sends one request, and prints one response.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub(crate) mod client;
mod commands;
pub(crate) mod exit_error;
pub(crate) mod output;

use exit_error::ExitError;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "ggdeploy", about = "Client for the edge component deployment daemon")]
struct Cli {
    /// Local IPC socket path the daemon is listening on.
    #[arg(long, env = "ECD_IPC_SOCKET", default_value = "/run/ggdeploymentd.socket", global = true)]
    socket: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit a local deployment from a components document.
    Deploy {
        /// Directory containing recipe files to stage before resolving.
        #[arg(long = "recipe-dir")]
        recipe_dir: Option<PathBuf>,

        /// Directory containing artifact files to stage before fetching.
        #[arg(long = "artifacts-dir")]
        artifacts_dir: Option<PathBuf>,

        /// JSON document mapping component name to `{version, configurationUpdate?}`.
        components_file: PathBuf,
    },

    /// Show the deployment currently executing and the queue depth.
    Status,

    /// List components known to the on-disk component store.
    Components,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Deploy { recipe_dir, artifacts_dir, components_file } => {
            commands::deploy::handle(&cli.socket, cli.format, recipe_dir, artifacts_dir, components_file).await
        }
        Command::Status => commands::status::handle(&cli.socket, cli.format).await,
        Command::Components => commands::components::handle(&cli.socket, cli.format).await,
    };

    if let Err(err) = result {
        if let Some(exit_error) = err.downcast_ref::<ExitError>() {
            eprintln!("error: {exit_error}");
            std::process::exit(exit_error.code);
        }
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
