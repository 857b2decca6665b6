// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! `ggdeploy components`: components known to the on-disk component store.

use std::path::Path;

use crate::client::DaemonClient;
use crate::exit_error::ExitError;
use crate::output::{print_json, OutputFormat};

pub async fn handle(socket_path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let Ok(client) = DaemonClient::connect(socket_path) else {
        return Err(ExitError::new(1, format!("daemon is not running (socket: {})", socket_path.display())).into());
    };

    let components = client.list_components().await?;

    match format {
        OutputFormat::Json => print_json(&components)?,
        OutputFormat::Text => {
            if components.is_empty() {
                println!("No components installed");
            }
            for component in components {
                let running = component.running_version.as_deref().unwrap_or("-");
                println!("{}  running={}  versions={}", component.name, running, component.versions.join(","));
            }
        }
    }
    Ok(())
}
