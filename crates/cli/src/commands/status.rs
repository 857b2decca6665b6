// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! `ggdeploy status`: the current deployment (if any) and queue depth.

use std::path::Path;

use crate::client::DaemonClient;
use crate::exit_error::ExitError;
use crate::output::{print_json, OutputFormat};

pub async fn handle(socket_path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let Ok(client) = DaemonClient::connect(socket_path) else {
        return Err(ExitError::new(1, format!("daemon is not running (socket: {})", socket_path.display())).into());
    };

    let (current, queue_depth) = client.deployment_status().await?;

    match format {
        OutputFormat::Json => {
            print_json(&serde_json::json!({ "current": current, "queueDepth": queue_depth }))?;
        }
        OutputFormat::Text => match current {
            Some(deployment) => {
                println!("Deployment:   {}", deployment.deployment_id);
                println!("Thing group:  {}", deployment.thing_group);
                if let Some(jobs_id) = deployment.jobs_id {
                    println!("Jobs ID:      {jobs_id}");
                }
                if let Some(jobs_version) = deployment.jobs_version {
                    println!("Jobs version: {jobs_version}");
                }
            }
            None => println!("No deployment in progress"),
        },
    }

    if queue_depth > 0 {
        println!("Queued behind it: {queue_depth}");
    }
    Ok(())
}
