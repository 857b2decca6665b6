// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

use super::*;
use crate::Response;
use std::io::Cursor;

#[test]
fn encode_prefixes_with_big_endian_length() {
    let framed = encode(&Response::Pong).unwrap();
    let payload = serde_json::to_vec(&Response::Pong).unwrap();
    assert_eq!(&framed[..4], &(payload.len() as u32).to_be_bytes());
    assert_eq!(&framed[4..], payload.as_slice());
}

#[test]
fn decode_round_trips_through_encode() {
    let resp = Response::DeploymentCreated { deployment_id: "D1".to_string() };
    let framed = encode(&resp).unwrap();
    let decoded: Response = decode(&framed[4..]).unwrap();
    assert_eq!(decoded, resp);
}

#[tokio::test]
async fn write_message_then_read_message_round_trips() {
    let resp = Response::DeploymentStatus { current: None, queue_depth: 3 };
    let mut buf = Vec::new();
    write_message(&mut buf, &resp).await.unwrap();

    let mut cursor = Cursor::new(buf);
    let decoded: Response = read_message(&mut cursor).await.unwrap();
    assert_eq!(decoded, resp);
}

#[tokio::test]
async fn read_frame_rejects_oversized_length_prefix() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&(MAX_FRAME_LEN + 1).to_be_bytes());
    let mut cursor = Cursor::new(buf);
    let err = read_frame(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::FrameTooLarge(_)));
}

#[tokio::test]
async fn read_message_surfaces_truncated_stream_as_io_error() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&10u32.to_be_bytes());
    buf.extend_from_slice(b"short");
    let mut cursor = Cursor::new(buf);
    let result: Result<Response, _> = read_message(&mut cursor).await;
    assert!(matches!(result, Err(ProtocolError::Io(_))));
}
