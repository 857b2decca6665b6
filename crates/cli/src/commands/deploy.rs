// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! `ggdeploy deploy`: submit a local deployment (§6 `create_local_deployment`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ecd_core::ComponentRequest;

use crate::client::DaemonClient;
use crate::exit_error::ExitError;
use crate::output::{print_json, OutputFormat};

pub async fn handle(
    socket_path: &Path,
    format: OutputFormat,
    recipe_dir: Option<PathBuf>,
    artifacts_dir: Option<PathBuf>,
    components_file: PathBuf,
) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(&components_file)
        .map_err(|e| ExitError::new(1, format!("reading {}: {e}", components_file.display())))?;
    let components: BTreeMap<String, ComponentRequest> = serde_json::from_str(&contents)
        .map_err(|e| ExitError::new(1, format!("parsing {}: {e}", components_file.display())))?;

    let Ok(client) = DaemonClient::connect(socket_path) else {
        return Err(ExitError::new(1, format!("daemon is not running (socket: {})", socket_path.display())).into());
    };

    let deployment_id = client.create_local_deployment(recipe_dir, artifacts_dir, components).await?;

    match format {
        OutputFormat::Text => println!("Deployment queued: {deployment_id}"),
        OutputFormat::Json => print_json(&serde_json::json!({ "deploymentId": deployment_id }))?,
    }
    Ok(())
}
