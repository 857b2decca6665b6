// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! `ggdeploymentd`: the edge component deployment daemon's composition
//! root. Wires the Jobs listener, the deployment executor, and the local
//! IPC server around one set of owned, stack-local collaborators and runs
//! all three concurrently for the life of the process.

use std::sync::Arc;

use clap::Parser;
use ecd_adapters::{
    AwsSigv4Signer, DeviceIdentity, EcrCredentialsClient, HttpDataplane, HttpFleetStatusReporter, IpcServer,
    JobsListenerStatusReporter, ReqwestDownloader, RumqttcTransport, SubprocessDockerPuller, SubprocessRecipeTranslator,
    SystemRebootInvoker, SystemdHealthStatusService, SystemdServiceManager, TesCredentialsClient, ZipFileExtractor,
};
use ecd_core::{CurrentJobCell, DeploymentQueue};
use ecd_exec::{BootstrapManager, DeploymentExecutor, ExecutorDeps, StaleCleanup, CORE_TARGET_UNIT};
use ecd_fetch::ArtifactFetcher;
use ecd_jobs::JobsListener;
use ecd_resolver::{PlatformAttributes, RecipeStore};
use ecd_storage::{CheckpointStore, ConfigFacade, GroupRootsStore, JsonConfigStore, SharedConfig};
use tracing::info;

mod args;
mod logging;
mod status;

use args::Args;
use status::{QueueDeploymentSubmitter, QueueStatusProvider};

const NUCLEUS_CONFIGURATION_PREFIX: &str = "services/aws.greengrass.NucleusLite/configuration";
const DEFAULT_NUCLEUS_VERSION: &str = "2.0.0";
const DEFAULT_DATA_PLANE_PORT: &str = "8443";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let _log_guard = logging::install(&args.log_level, args.log_file.as_deref());

    std::fs::create_dir_all(&args.root_path)?;
    let config: SharedConfig =
        Arc::new(JsonConfigStore::open(args.root_path.join("config.json")).map_err(|e| e.to_string())?);

    let checkpoints = CheckpointStore::new(Arc::clone(&config));
    let group_roots = GroupRootsStore::new(Arc::clone(&config));
    let recipes = Arc::new(RecipeStore::new(&args.root_path));

    let region = config
        .read_string(&format!("{NUCLEUS_CONFIGURATION_PREFIX}/awsRegion"))?
        .unwrap_or_else(|| "us-east-1".to_string());
    let data_plane_endpoint = config
        .read_string(&format!("{NUCLEUS_CONFIGURATION_PREFIX}/iotDataEndpoint"))?
        .unwrap_or_default();
    let data_plane_port = config
        .read_string(&format!("{NUCLEUS_CONFIGURATION_PREFIX}/greengrassDataPlanePort"))?
        .unwrap_or_else(|| DEFAULT_DATA_PLANE_PORT.to_string());
    let nucleus_version = config
        .read_string("services/aws.greengrass.NucleusLite/version")?
        .unwrap_or_else(|| DEFAULT_NUCLEUS_VERSION.to_string());

    info!(root_path = %args.root_path.display(), region, "starting ggdeploymentd");

    let thing_name = JobsListener::thing_name_with_retry(config.as_ref()).await;
    let identity = DeviceIdentity::from_config(config.as_ref()).map_err(|e| e.to_string())?;
    let http_client = identity.reqwest_client().map_err(|e| e.to_string())?;

    let dataplane = HttpDataplane::new(http_client.clone(), &data_plane_endpoint, &data_plane_port);
    let platform = PlatformAttributes::linux_nucleus_lite(std::env::consts::ARCH.to_string(), None);

    let queue = Arc::new(DeploymentQueue::with_capacity(args.queue_capacity));
    let current_job = Arc::new(CurrentJobCell::new());

    let (mqtt_events_tx, mqtt_events_rx) = tokio::sync::mpsc::channel(64);
    let mqtt_transport =
        RumqttcTransport::connect(&data_plane_endpoint, &thing_name, &identity, mqtt_events_tx).map_err(|e| e.to_string())?;

    let http_downloader = ReqwestDownloader::new(http_client.clone());
    let signer = AwsSigv4Signer;
    let zip_extractor = ZipFileExtractor;
    let docker = SubprocessDockerPuller::new();
    let tes = TesCredentialsClient::new(http_client.clone());
    let ecr = EcrCredentialsClient::new(http_client.clone(), AwsSigv4Signer);
    let services = SystemdServiceManager::new();
    let health = SystemdHealthStatusService::new();
    let reboot = SystemRebootInvoker;
    let translator = SubprocessRecipeTranslator::new();
    let fleet_status = HttpFleetStatusReporter::new(http_client.clone(), data_plane_endpoint.clone(), thing_name.clone());

    let fetcher = ArtifactFetcher::new(
        &args.root_path,
        region,
        &http_downloader,
        &signer,
        &zip_extractor,
        &docker,
        &ecr,
        &dataplane,
    );
    let bootstrap = BootstrapManager::new(&checkpoints, &services, &reboot);
    let stale_cleanup = StaleCleanup::new(&services, config.as_ref());

    let jobs_listener = JobsListener::new(&mqtt_transport, &checkpoints, &queue, &current_job, thing_name.clone());
    let job_status = JobsListenerStatusReporter::new(&jobs_listener);

    let deps = ExecutorDeps {
        root: args.root_path.clone(),
        recipes: &recipes,
        config: config.as_ref(),
        group_roots: &group_roots,
        dataplane: &dataplane,
        nucleus_version,
        platform,
        thing_name,
        target_unit: CORE_TARGET_UNIT.to_string(),
        tes: &tes,
        fetcher: &fetcher,
        translator: &translator,
        services: &services,
        health: &health,
        bootstrap: &bootstrap,
        stale_cleanup: &stale_cleanup,
        fleet_status: &fleet_status,
        job_status: &job_status,
        checkpoints: &checkpoints,
        queue: &queue,
        current_job: &current_job,
    };
    let executor = DeploymentExecutor::new(deps);

    let submitter = Arc::new(QueueDeploymentSubmitter { queue: Arc::clone(&queue) });
    let status_provider = Arc::new(QueueStatusProvider {
        queue: Arc::clone(&queue),
        current_job: Arc::clone(&current_job),
        recipes: Arc::clone(&recipes),
        config: Arc::clone(&config),
    });

    let ipc_server = match IpcServer::from_socket_activation(submitter.clone(), status_provider.clone()).map_err(|e| e.to_string())? {
        Some(server) => server,
        None => IpcServer::bind(&args.ipc_socket, submitter, status_provider).map_err(|e| e.to_string())?,
    };

    executor.run_recovered().await;
    info!("startup recovery complete, entering main loop");

    tokio::join!(executor.run_forever(), jobs_listener.run(mqtt_events_rx), ipc_server.run());
    Ok(())
}
