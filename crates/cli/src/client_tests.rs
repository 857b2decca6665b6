// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

use ecd_wire::{read_message, write_message, Response};

use super::*;

#[test]
fn connect_fails_gracefully_when_nothing_is_listening() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("ggdeploymentd.socket");

    let err = DaemonClient::connect(&socket_path).unwrap_err();
    assert!(matches!(err, ClientError::Connect(_, _)));
    assert!(socket_missing(&socket_path));
}

#[tokio::test]
async fn send_round_trips_a_request_over_the_socket() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("ggdeploymentd.socket");

    let listener = tokio::net::UnixListener::bind(&socket_path).unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _request: Request = read_message(&mut stream).await.unwrap();
        write_message(&mut stream, &Response::Pong).await.unwrap();
    });

    let client = DaemonClient::connect(&socket_path).unwrap();
    let response = client.send(&Request::Ping).await.unwrap();
    assert_eq!(response, Response::Pong);
}

#[tokio::test]
async fn deployment_status_rejects_an_unexpected_response_variant() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("ggdeploymentd.socket");

    let listener = tokio::net::UnixListener::bind(&socket_path).unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _request: Request = read_message(&mut stream).await.unwrap();
        write_message(&mut stream, &Response::Pong).await.unwrap();
    });

    let client = DaemonClient::connect(&socket_path).unwrap();
    let err = client.deployment_status().await.unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedResponse(Response::Pong)));
}

#[tokio::test]
async fn daemon_error_response_surfaces_as_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("ggdeploymentd.socket");

    let listener = tokio::net::UnixListener::bind(&socket_path).unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _request: Request = read_message(&mut stream).await.unwrap();
        write_message(&mut stream, &Response::Error { message: "queue is full".to_string() }).await.unwrap();
    });

    let client = DaemonClient::connect(&socket_path).unwrap();
    let err = client.list_components().await.unwrap_err();
    match err {
        ClientError::Daemon(message) => assert_eq!(message, "queue is full"),
        other => panic!("expected ClientError::Daemon, got {other:?}"),
    }
}
