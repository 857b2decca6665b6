use super::*;

#[test]
fn registry_host_takes_the_first_path_segment() {
    assert_eq!(registry_host("123456789012.dkr.ecr.us-east-1.amazonaws.com/my-repo:1.0.0"), "123456789012.dkr.ecr.us-east-1.amazonaws.com");
    assert_eq!(registry_host("ubuntu:latest"), "ubuntu:latest");
}

#[tokio::test]
async fn image_present_is_false_when_binary_is_missing() {
    let puller = SubprocessDockerPuller::with_binary("definitely-not-a-real-binary-xyz");
    let result = puller.image_present("whatever:latest").await;
    assert!(result.is_err());
}
