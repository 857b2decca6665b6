use super::*;

#[tokio::test]
async fn fake_cloud_dataplane_answers_seeded_thing_groups() {
    let dataplane = FakeCloudDataplane::new();
    dataplane.set_thing_groups("thing-1", vec!["group-a".to_string()]);
    assert_eq!(dataplane.get_thing_groups("thing-1").await.unwrap(), vec!["group-a".to_string()]);
    assert_eq!(dataplane.get_thing_groups("thing-2").await.unwrap(), Vec::<String>::new());
}

#[tokio::test]
async fn fake_service_manager_records_calls_in_order() {
    let manager = FakeServiceManager::new();
    manager.stop("ggl.foo.service").await.unwrap();
    manager.disable("ggl.foo.service").await.unwrap();
    manager.unlink("ggl.foo.service").await.unwrap();
    assert_eq!(manager.calls(), vec!["stop ggl.foo.service", "disable ggl.foo.service", "unlink ggl.foo.service"]);
}

#[tokio::test]
async fn fake_mqtt_transport_resolves_a_rejection_as_a_remote_error() {
    let transport = FakeMqttTransport::new();
    transport.set_rejection("jobs/update/rejected", "{\"code\":\"VersionMismatch\"}");
    let result = transport.request("jobs/update/rejected", b"{}".to_vec()).await;
    assert!(matches!(result, Err(CoreError::Remote(_))));
}

#[tokio::test]
async fn fake_reboot_invoker_records_invocation() {
    let invoker = FakeRebootInvoker::new();
    assert!(!invoker.was_invoked());
    invoker.reboot().await.unwrap();
    assert!(invoker.was_invoked());
}
