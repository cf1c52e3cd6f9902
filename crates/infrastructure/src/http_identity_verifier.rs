use std::time::Duration;

use async_trait::async_trait;
use catalog_application::{AuthRejection, IdentityVerifier};
use catalog_core::{BearerToken, Identity};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::warn;

/// Identity verifier delegating bearer-token checks to the user service.
#[derive(Clone)]
pub struct HttpIdentityVerifier {
    http_client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpIdentityVerifier {
    /// Creates a verifier calling `endpoint` with a per-request timeout.
    #[must_use]
    pub fn new(http_client: reqwest::Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdentityEnvelope {
    user: IdentityBody,
}

#[derive(Debug, Deserialize)]
struct IdentityBody {
    email: String,
    role: String,
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &BearerToken) -> Result<Identity, AuthRejection> {
        let response = self
            .http_client
            .get(self.endpoint.as_str())
            .header(AUTHORIZATION, token.to_header_value())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|error| {
                warn!(endpoint = %self.endpoint, %error, "identity service request failed");
                AuthRejection::UpstreamUnavailable
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(endpoint = %self.endpoint, %status, "identity service rejected token");
            return Err(AuthRejection::UpstreamUnauthorized);
        }

        let envelope = response.json::<IdentityEnvelope>().await.map_err(|error| {
            warn!(endpoint = %self.endpoint, %error, "identity service returned unreadable body");
            if error.is_timeout() {
                AuthRejection::UpstreamUnavailable
            } else {
                AuthRejection::UpstreamMalformed
            }
        })?;

        Ok(Identity::new(envelope.user.email, envelope.user.role))
    }
}

#[cfg(test)]
mod tests;
