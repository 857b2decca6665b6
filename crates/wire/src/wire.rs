// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Length-prefixed JSON framing: a 4-byte big-endian length prefix followed
//! by the JSON-encoded payload.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{Request, Response};

/// Reject frames larger than this many bytes — generous for a deployment
/// document or component listing, small enough to bound a malicious or
/// corrupt peer's memory impact.
pub const MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame of {0} bytes exceeds the {MAX_FRAME_LEN} byte limit")]
    FrameTooLarge(u32),

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a value as a length-prefixed frame.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    let payload = serde_json::to_vec(value)?;
    let len = u32::try_from(payload.len()).map_err(|_| ProtocolError::FrameTooLarge(u32::MAX))?;
    let mut framed = Vec::with_capacity(4 + payload.len());
    framed.extend_from_slice(&len.to_be_bytes());
    framed.extend_from_slice(&payload);
    Ok(framed)
}

/// Decode a length-prefixed frame's payload (without the length prefix).
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Read one length-prefixed frame's payload bytes from `reader`.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes).await?;
    let len = u32::from_be_bytes(len_bytes);
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(len));
    }
    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

/// Write one length-prefixed frame.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError> {
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read and decode one message of type `T`.
pub async fn read_message<T: DeserializeOwned, R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<T, ProtocolError> {
    let payload = read_frame(reader).await?;
    decode(&payload)
}

/// Encode and write one message.
pub async fn write_message<T: Serialize, W: AsyncWrite + Unpin>(
    writer: &mut W,
    value: &T,
) -> Result<(), ProtocolError> {
    let framed = encode(value)?;
    write_frame(writer, &framed).await
}

/// Read a [`Request`] frame — a thin alias kept for call-site clarity at the
/// IPC server's accept loop.
pub async fn read_request<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Request, ProtocolError> {
    read_message(reader).await
}

/// Write a [`Response`] frame.
pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response,
) -> Result<(), ProtocolError> {
    write_message(writer, response).await
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
