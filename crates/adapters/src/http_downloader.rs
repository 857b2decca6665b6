// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! The HTTP client (§1, §4.5): downloads a URL's body to a file on disk
//! with the requested Unix permission mode, implementing
//! [`HttpDownloader`].

use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use async_trait::async_trait;
use ecd_core::{CoreError, CoreResult};
use ecd_fetch::{HttpDownload, HttpDownloader};
use futures_util::StreamExt;
use tracing::debug;

pub struct ReqwestDownloader {
    client: reqwest::Client,
}

impl ReqwestDownloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpDownloader for ReqwestDownloader {
    async fn download(&self, url: &str, headers: &[(String, String)], dest: &Path, mode: u32) -> CoreResult<HttpDownload> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| CoreError::failure(format!("GET {url}: {e}")))?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Ok(HttpDownload { status });
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(mode)
            .open(dest)
            .map_err(|e| CoreError::failure(format!("opening {}: {e}", dest.display())))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| CoreError::failure(format!("reading body from {url}: {e}")))?;
            file.write_all(&chunk).map_err(|e| CoreError::failure(format!("writing {}: {e}", dest.display())))?;
        }
        file.sync_all().map_err(|e| CoreError::failure(format!("fsync {}: {e}", dest.display())))?;
        debug!(%url, dest = %dest.display(), status, "downloaded artifact");

        Ok(HttpDownload { status })
    }
}

#[cfg(test)]
#[path = "http_downloader_tests.rs"]
mod tests;
