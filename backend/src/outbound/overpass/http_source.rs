//! Reqwest-backed Overpass boundary source.
//!
//! The adapter owns transport details only: query text, request headers,
//! timeout and HTTP status mapping, and JSON decoding through DTOs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::OverpassResponseDto;
use super::query::{build_candidate_query, build_geometry_query};
use crate::domain::ports::{BoundarySource, BoundarySourceError, CandidateSearch, ElementGraph};
use crate::domain::{CompositeId, RawFeature};

pub const DEFAULT_CANDIDATE_QUERY_TIMEOUT_SECONDS: u32 = 25;
pub const DEFAULT_GEOMETRY_QUERY_TIMEOUT_SECONDS: u32 = 10;
const DEFAULT_USER_AGENT: &str = "city-boundaries/0.1";
const DEFAULT_CONTACT: &str = "ops@city-boundaries.invalid";

/// Outbound identity and per-stage query timeouts for Overpass requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassHttpIdentity {
    /// HTTP user-agent sent to Overpass.
    pub user_agent: String,
    /// Contact header value sent to Overpass.
    pub contact: String,
    /// Timeout directive for the candidate search.
    pub candidate_query_timeout_seconds: u32,
    /// Timeout directive for each geometry fetch.
    pub geometry_query_timeout_seconds: u32,
}

impl Default for OverpassHttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            contact: DEFAULT_CONTACT.to_owned(),
            candidate_query_timeout_seconds: DEFAULT_CANDIDATE_QUERY_TIMEOUT_SECONDS,
            geometry_query_timeout_seconds: DEFAULT_GEOMETRY_QUERY_TIMEOUT_SECONDS,
        }
    }
}

/// Boundary source that POSTs Overpass QL to one interpreter endpoint.
pub struct OverpassHttpBoundarySource {
    client: Client,
    endpoint: Url,
    identity: OverpassHttpIdentity,
}

impl OverpassHttpBoundarySource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_identity(endpoint, timeout, OverpassHttpIdentity::default())
    }

    /// Build an adapter with explicit outbound identity and query timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        endpoint: Url,
        timeout: Duration,
        mut identity: OverpassHttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        identity.candidate_query_timeout_seconds = identity.candidate_query_timeout_seconds.max(1);
        identity.geometry_query_timeout_seconds = identity.geometry_query_timeout_seconds.max(1);
        Ok(Self {
            client,
            endpoint,
            identity,
        })
    }

    async fn post_query(&self, query: String) -> Result<OverpassResponseDto, BoundarySourceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::USER_AGENT, self.identity.user_agent.as_str())
            .header("Contact", self.identity.contact.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("data", query)])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        debug!(bytes = body.len(), "overpass response received");
        decode_response(body.as_ref())
    }
}

#[async_trait]
impl BoundarySource for OverpassHttpBoundarySource {
    async fn search_candidates(
        &self,
        search: &CandidateSearch,
    ) -> Result<Vec<RawFeature>, BoundarySourceError> {
        let query = build_candidate_query(
            &search.city_name,
            search.territory,
            self.identity.candidate_query_timeout_seconds,
        )?;
        Ok(self.post_query(query).await?.into_features())
    }

    async fn fetch_element_graph(&self, id: CompositeId) -> Result<ElementGraph, BoundarySourceError> {
        let query = build_geometry_query(id, self.identity.geometry_query_timeout_seconds);
        self.post_query(query)
            .await?
            .into_element_graph()
            .map_err(BoundarySourceError::decode)
    }
}

fn decode_response(body: &[u8]) -> Result<OverpassResponseDto, BoundarySourceError> {
    serde_json::from_slice(body).map_err(|error| {
        BoundarySourceError::decode(format!("invalid Overpass JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> BoundarySourceError {
    if error.is_timeout() {
        BoundarySourceError::timeout(error.to_string())
    } else {
        BoundarySourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> BoundarySourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => BoundarySourceError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            BoundarySourceError::timeout(message)
        }
        _ if status.is_client_error() => BoundarySourceError::invalid_request(message),
        _ => BoundarySourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
