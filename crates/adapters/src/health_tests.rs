use std::time::Duration;

use super::*;

#[tokio::test]
async fn wait_for_terminal_errors_when_systemctl_is_missing() {
    let service = SystemdHealthStatusService::with_binary("definitely-not-a-real-binary-xyz");
    let result = service.wait_for_terminal("ggl.foo.service", Duration::from_millis(50)).await;
    assert!(result.is_err());
}
