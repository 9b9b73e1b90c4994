//! Reqwest-backed identity verifier.
//!
//! Sends the caller's bearer token to the configured session endpoint and
//! reads the user identifier from the JSON reply.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::domain::UserId;
use crate::domain::ports::{IdentityVerifier, IdentityVerifierError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionDto {
    user_id: String,
}

/// Verifier that calls an external session endpoint.
pub struct HttpIdentityVerifier {
    client: Client,
    endpoint: Url,
}

impl HttpIdentityVerifier {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, bearer_token: &str) -> Result<UserId, IdentityVerifierError> {
        if bearer_token.trim().is_empty() {
            return Err(IdentityVerifierError::rejected("empty bearer token"));
        }

        let response = self
            .client
            .get(self.endpoint.clone())
            .bearer_auth(bearer_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| IdentityVerifierError::unavailable(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| IdentityVerifierError::unavailable(error.to_string()))?;
        if !status.is_success() {
            debug!(status = status.as_u16(), "identity provider refused token");
            return Err(map_status_error(status));
        }
        parse_session(body.as_ref())
    }
}

fn map_status_error(status: StatusCode) -> IdentityVerifierError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            IdentityVerifierError::rejected(format!("status {}", status.as_u16()))
        }
        _ => IdentityVerifierError::unavailable(format!("status {}", status.as_u16())),
    }
}

fn parse_session(body: &[u8]) -> Result<UserId, IdentityVerifierError> {
    let session: SessionDto = serde_json::from_slice(body).map_err(|error| {
        IdentityVerifierError::unavailable(format!("invalid session payload: {error}"))
    })?;
    UserId::new(session.user_id).map_err(|error| {
        IdentityVerifierError::unavailable(format!("invalid session user id: {error}"))
    })
}
