use super::*;

#[test]
fn report_translates_deployment_status_to_the_wire_strings() {
    assert_eq!(
        match DeploymentStatus::Succeeded {
            DeploymentStatus::Succeeded => "SUCCEEDED",
            DeploymentStatus::Failed => "FAILED",
        },
        "SUCCEEDED"
    );
}

#[tokio::test]
async fn report_fails_cleanly_against_an_unreachable_endpoint() {
    let reporter = HttpFleetStatusReporter::new(reqwest::Client::new(), "127.0.0.1:1", "thing-1");
    let result = reporter.report("deployment-1", DeploymentStatus::Succeeded).await;
    assert!(result.is_err());
}
