// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Device mTLS identity (§6: `system/rootCaPath`, `system/certificateFilePath`,
//! `system/privateKeyPath`), used to authenticate every cloud dataplane
//! call and Jobs MQTT connection.

use std::path::PathBuf;

use ecd_core::{CoreError, CoreResult};
use ecd_storage::ConfigFacade;

#[derive(Debug, Clone)]
pub struct DeviceIdentity {
    pub root_ca_path: PathBuf,
    pub certificate_path: PathBuf,
    pub private_key_path: PathBuf,
}

impl DeviceIdentity {
    pub fn from_config(config: &dyn ConfigFacade) -> CoreResult<Self> {
        let root_ca_path = required_path(config, "system/rootCaPath")?;
        let certificate_path = required_path(config, "system/certificateFilePath")?;
        let private_key_path = required_path(config, "system/privateKeyPath")?;
        Ok(Self { root_ca_path, certificate_path, private_key_path })
    }

    /// Build a `reqwest::Client` presenting this device's client
    /// certificate and trusting the core's private CA, for mTLS calls to
    /// the cloud dataplane.
    pub fn reqwest_client(&self) -> CoreResult<reqwest::Client> {
        let ca_pem = std::fs::read(&self.root_ca_path)
            .map_err(|e| CoreError::failure(format!("reading root CA {}: {e}", self.root_ca_path.display())))?;
        let mut identity_pem = std::fs::read(&self.certificate_path)
            .map_err(|e| CoreError::failure(format!("reading certificate {}: {e}", self.certificate_path.display())))?;
        let key_pem = std::fs::read(&self.private_key_path)
            .map_err(|e| CoreError::failure(format!("reading private key {}: {e}", self.private_key_path.display())))?;
        identity_pem.extend_from_slice(b"\n");
        identity_pem.extend_from_slice(&key_pem);

        let ca_cert = reqwest::Certificate::from_pem(&ca_pem)
            .map_err(|e| CoreError::failure(format!("parsing root CA pem: {e}")))?;
        let identity = reqwest::Identity::from_pem(&identity_pem)
            .map_err(|e| CoreError::failure(format!("parsing device identity pem: {e}")))?;

        reqwest::Client::builder()
            .add_root_certificate(ca_cert)
            .identity(identity)
            .use_rustls_tls()
            .build()
            .map_err(|e| CoreError::failure(format!("building mTLS http client: {e}")))
    }
}

fn required_path(config: &dyn ConfigFacade, key: &str) -> CoreResult<PathBuf> {
    config
        .read_string(key)
        .map_err(|e| CoreError::failure(format!("reading {key}: {e}")))?
        .map(PathBuf::from)
        .ok_or_else(|| CoreError::not_found(format!("missing required config key {key}")))
}

#[cfg(test)]
#[path = "device_identity_tests.rs"]
mod tests;
