// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! SigV4 request signing (§4.5) for `s3://` artifact downloads and private
//! ECR authentication, using TES credentials.

use chrono::Utc;
use ecd_core::CoreResult;
use ecd_fetch::{AwsCredentials, Sigv4Signer};
use hex::encode as hex_encode;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub struct AwsSigv4Signer;

impl Default for AwsSigv4Signer {
    fn default() -> Self {
        Self
    }
}

impl Sigv4Signer for AwsSigv4Signer {
    fn sign(
        &self,
        method: &str,
        host: &str,
        path: &str,
        region: &str,
        service: &str,
        credentials: &AwsCredentials,
    ) -> CoreResult<Vec<(String, String)>> {
        let now = Utc::now();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = now.format("%Y%m%d").to_string();

        let canonical_headers = format!("host:{host}\nx-amz-date:{amz_date}\n");
        let signed_headers = "host;x-amz-date";
        let payload_hash = hex_encode(Sha256::digest(b""));

        let canonical_request =
            format!("{method}\n{path}\n\n{canonical_headers}\n{signed_headers}\n{payload_hash}");

        let credential_scope = format!("{date_stamp}/{region}/{service}/aws4_request");
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{amz_date}\n{credential_scope}\n{}",
            hex_encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = derive_signing_key(&credentials.secret_access_key, &date_stamp, region, service);
        let signature = hex_encode(hmac(&signing_key, string_to_sign.as_bytes()));

        let authorization = format!(
            "AWS4-HMAC-SHA256 Credential={}/{credential_scope}, SignedHeaders={signed_headers}, Signature={signature}",
            credentials.access_key_id
        );

        let mut headers = vec![
            ("Authorization".to_string(), authorization),
            ("x-amz-date".to_string(), amz_date),
        ];
        if let Some(token) = &credentials.session_token {
            headers.push(("x-amz-security-token".to_string(), token.clone()));
        }
        Ok(headers)
    }
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    // HMAC-SHA256 accepts a key of any length, so this never actually fails.
    match HmacSha256::new_from_slice(key) {
        Ok(mut mac) => {
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Err(_) => Vec::new(),
    }
}

fn derive_signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac(format!("AWS4{secret}").as_bytes(), date_stamp.as_bytes());
    let k_region = hmac(&k_date, region.as_bytes());
    let k_service = hmac(&k_region, service.as_bytes());
    hmac(&k_service, b"aws4_request")
}

#[cfg(test)]
#[path = "sigv4_tests.rs"]
mod tests;
