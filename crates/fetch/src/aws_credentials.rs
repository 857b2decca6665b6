// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The ecd Authors

//! Short-lived AWS credentials obtained from the token-exchange service
//! (TES), used to sign outbound S3 and ECR requests.

/// Never logged in full; [`std::fmt::Debug`] redacts the secret fields.
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
