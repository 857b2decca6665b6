// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! §8 scenarios 1 and 4: full deployment-executor runs against a real
//! on-disk config/recipe/checkpoint store, with every external
//! collaborator faked.

use ecd_core::{test_support, DeploymentStateCheckpoint, DeploymentType};
use ecd_exec::LifecycleState;

use crate::fixtures::Fixture;

/// Scenario 1: a local deployment of a single new component installs and
/// starts it, writes its version to config, records the root under the
/// `LOCAL_DEPLOYMENTS` group-roots map, and reports success.
#[tokio::test]
async fn local_deployment_single_component_installs_and_reports_success() {
    let fx = Fixture::new();
    fx.write_recipe("foo", "1.0.0");
    fx.write_unit("ggl.foo.service");

    let fetcher = fx.fetcher();
    let bootstrap = fx.bootstrap();
    let stale = fx.stale_cleanup();
    let executor = fx.executor(&fetcher, &bootstrap, &stale);

    let doc = test_support::local_deployment_doc("L1", &[("foo", "1.0.0")]);
    let deployment = ecd_core::Deployment::parse(&doc, DeploymentType::Local).unwrap();
    let mut checkpoint = DeploymentStateCheckpoint::for_deployment(deployment.clone(), None, None);

    executor.run_deployment(deployment.clone(), &mut checkpoint).await;

    assert_eq!(fx.config.read_string("services/foo/version").unwrap().as_deref(), Some("1.0.0"));

    let roots = fx.group_roots.roots_for("LOCAL_DEPLOYMENTS").expect("local deployment roots must be persisted");
    assert_eq!(roots.get("foo").unwrap().as_str(), "1.0.0");

    let calls = fx.services.calls();
    assert!(calls.iter().any(|c| c.contains("ggl.foo.service") && c.starts_with("link")));
    assert!(calls.contains(&"enable ggl.foo.service".to_string()));
    assert!(calls.contains(&format!("start {}", ecd_exec::CORE_TARGET_UNIT)));

    let reports = fx.fleet_status.reports();
    assert_eq!(reports, vec![("L1".to_string(), ecd_exec::DeploymentStatus::Succeeded)]);
    assert!(fx.checkpoints.recover().is_none(), "checkpoint must be cleared after a successful deployment");
}

/// Scenario 4: a deployment includes `baz` with a `.bootstrap.service`
/// unit. The first run must checkpoint `bootstrapComponents.baz` and the
/// full deployment document, then request a reboot without reaching
/// install/run. A second executor built fresh against the same on-disk
/// state (simulating the post-reboot process restart) must recover that
/// checkpoint, skip the already-completed bootstrap step, and finish the
/// deployment normally.
#[tokio::test]
async fn bootstrap_triggers_reboot_then_resumes_and_completes_after_restart() {
    let fx = Fixture::new();
    fx.write_recipe("baz", "1.0.0");
    fx.write_unit("ggl.baz.bootstrap.service");
    fx.write_unit("ggl.baz.service");

    let doc = test_support::local_deployment_doc("D4", &[("baz", "1.0.0")]);
    let deployment = ecd_core::Deployment::parse(&doc, DeploymentType::Local).unwrap();

    {
        let fetcher = fx.fetcher();
        let bootstrap = fx.bootstrap();
        let stale = fx.stale_cleanup();
        let executor = fx.executor(&fetcher, &bootstrap, &stale);

        let mut checkpoint = executor_new_checkpoint(&deployment);
        executor.run_deployment(deployment.clone(), &mut checkpoint).await;
    }

    assert!(fx.reboot.was_invoked(), "a bootstrap unit must trigger a reboot request");
    assert!(!fx.services.calls().iter().any(|c| c == "daemon-reload"), "install/run phases must not run before reboot");

    let persisted = fx.checkpoints.recover().expect("checkpoint must survive the simulated reboot");
    assert_eq!(persisted.bootstrap_components.get("baz").map(String::as_str), Some("1.0.0"));
    assert_eq!(persisted.deployment_doc.as_ref().unwrap().deployment_id, deployment.deployment_id);

    // Second executor instance, same on-disk config/checkpoint store,
    // standing in for the daemon process restarting after the reboot.
    let fetcher = fx.fetcher();
    let bootstrap = fx.bootstrap();
    let stale = fx.stale_cleanup();
    let executor = fx.executor(&fetcher, &bootstrap, &stale);

    executor.run_recovered().await;

    assert!(fx.checkpoints.recover().is_none(), "checkpoint must be cleared once the resumed deployment completes");
    assert_eq!(fx.config.read_string("services/baz/version").unwrap().as_deref(), Some("1.0.0"));
    let calls = fx.services.calls();
    assert!(calls.contains(&"daemon-reload".to_string()), "the resumed run must reach install/run/reload");
    assert!(calls.iter().filter(|c| c.contains("ggl.baz.bootstrap.service")).count() == 1, "bootstrap must not re-run on resume");

    let reports = fx.fleet_status.reports();
    assert_eq!(reports, vec![("D4".to_string(), ecd_exec::DeploymentStatus::Succeeded)]);
}

/// A component install unit that reports `BROKEN` fails the deployment
/// without running the remainder of the pipeline.
#[tokio::test]
async fn broken_install_unit_fails_the_deployment() {
    let fx = Fixture::with_health(LifecycleState::Broken);
    fx.write_recipe("foo", "1.0.0");
    fx.write_unit("ggl.foo.install.service");

    let fetcher = fx.fetcher();
    let bootstrap = fx.bootstrap();
    let stale = fx.stale_cleanup();
    let executor = fx.executor(&fetcher, &bootstrap, &stale);

    let doc = test_support::local_deployment_doc("D-broken", &[("foo", "1.0.0")]);
    let deployment = ecd_core::Deployment::parse(&doc, DeploymentType::Local).unwrap();
    let mut checkpoint = executor_new_checkpoint(&deployment);

    executor.run_deployment(deployment.clone(), &mut checkpoint).await;

    let reports = fx.fleet_status.reports();
    assert_eq!(reports, vec![("D-broken".to_string(), ecd_exec::DeploymentStatus::Failed)]);
    assert!(fx.checkpoints.recover().is_none(), "checkpoint is cleared unconditionally, even on failure");
}

fn executor_new_checkpoint(deployment: &ecd_core::Deployment) -> DeploymentStateCheckpoint {
    DeploymentStateCheckpoint::for_deployment(deployment.clone(), None, None)
}
