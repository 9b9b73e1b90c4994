//! Server settings loaded via OrthoConfig, and the resolved server config.
//!
//! Every setting can be supplied as a `CITY_BOUNDARIES_*` environment
//! variable or the matching command-line flag. Accessors fall back to the
//! documented defaults.

use std::net::SocketAddr;
use std::time::Duration;

use city_boundaries::domain::{
    DEFAULT_MAX_CONCURRENT_GEOMETRY_FETCHES, DEFAULT_RESULT_LIMIT, MAX_RESULT_LIMIT,
};
use city_boundaries::outbound::overpass::{
    DEFAULT_CANDIDATE_QUERY_TIMEOUT_SECONDS, DEFAULT_GEOMETRY_QUERY_TIMEOUT_SECONDS,
    OverpassHttpIdentity,
};
use city_boundaries::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Raised when a configured value cannot be used.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("bind_addr {value:?} is not a socket address")]
    BindAddr { value: String },
    #[error("{field} {value:?} is not a valid URL: {source}")]
    Endpoint {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("default_result_limit must be between 1 and {max} (got {value})")]
    ResultLimit { value: usize, max: usize },
}

impl From<SettingsError> for std::io::Error {
    fn from(value: SettingsError) -> Self {
        std::io::Error::other(value)
    }
}

/// Configuration values for the boundary service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CITY_BOUNDARIES")]
pub struct BoundaryServerSettings {
    /// Listener address, `host:port`.
    pub bind_addr: Option<String>,
    /// Overpass interpreter endpoint.
    pub overpass_endpoint: Option<String>,
    /// Client-side timeout for each outbound HTTP request.
    pub http_timeout_seconds: Option<u64>,
    /// Server-side timeout embedded in candidate search queries.
    pub candidate_query_timeout_seconds: Option<u32>,
    /// Server-side timeout embedded in geometry queries.
    pub geometry_query_timeout_seconds: Option<u32>,
    /// `User-Agent` sent to the Overpass endpoint.
    pub user_agent: Option<String>,
    /// Operator contact sent in the `Contact` header.
    pub contact: Option<String>,
    /// Result limit applied when a search omits `limit`.
    pub default_result_limit: Option<usize>,
    /// Upper bound on concurrent geometry fetches per search.
    pub max_concurrent_geometry_fetches: Option<usize>,
    /// Session endpoint used to verify bearer tokens.
    pub identity_endpoint: Option<String>,
    /// PostgreSQL URL for selection storage; in-memory storage when absent.
    pub database_url: Option<String>,
}

fn parse_endpoint(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::Endpoint {
        field,
        value: value.to_owned(),
        source,
    })
}

impl BoundaryServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|_| SettingsError::BindAddr {
            value: value.to_owned(),
        })
    }

    pub fn overpass_endpoint(&self) -> Result<Url, SettingsError> {
        parse_endpoint(
            "overpass_endpoint",
            self.overpass_endpoint
                .as_deref()
                .unwrap_or(DEFAULT_OVERPASS_ENDPOINT),
        )
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(
            self.http_timeout_seconds
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECONDS)
                .max(1),
        )
    }

    /// Request identity and query timeouts for the Overpass adapter.
    pub fn overpass_identity(&self) -> OverpassHttpIdentity {
        let defaults = OverpassHttpIdentity::default();
        OverpassHttpIdentity {
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            contact: self.contact.clone().unwrap_or(defaults.contact),
            candidate_query_timeout_seconds: self
                .candidate_query_timeout_seconds
                .unwrap_or(DEFAULT_CANDIDATE_QUERY_TIMEOUT_SECONDS),
            geometry_query_timeout_seconds: self
                .geometry_query_timeout_seconds
                .unwrap_or(DEFAULT_GEOMETRY_QUERY_TIMEOUT_SECONDS),
        }
    }

    pub fn default_result_limit(&self) -> Result<usize, SettingsError> {
        let value = self.default_result_limit.unwrap_or(DEFAULT_RESULT_LIMIT);
        if (1..=MAX_RESULT_LIMIT).contains(&value) {
            Ok(value)
        } else {
            Err(SettingsError::ResultLimit {
                value,
                max: MAX_RESULT_LIMIT,
            })
        }
    }

    pub fn max_concurrent_geometry_fetches(&self) -> usize {
        self.max_concurrent_geometry_fetches
            .unwrap_or(DEFAULT_MAX_CONCURRENT_GEOMETRY_FETCHES)
            .max(1)
    }

    pub fn identity_endpoint(&self) -> Result<Option<Url>, SettingsError> {
        self.identity_endpoint
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(|value| parse_endpoint("identity_endpoint", value))
            .transpose()
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }
}

/// Resolved configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) settings: BoundaryServerSettings,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the bind address is malformed.
    pub fn from_settings(settings: BoundaryServerSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            settings,
            db_pool: None,
        })
    }

    /// Use PostgreSQL-backed selection storage.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
