//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on domain ports,
//! so they can be exercised without network or database access.

use std::sync::Arc;

use crate::domain::DEFAULT_RESULT_LIMIT;
use crate::domain::ports::{
    BoundarySearchQuery, BoundarySelectionCommand, BoundarySelectionQuery,
    FixtureBoundarySearchQuery, FixtureBoundarySelectionCommand, FixtureBoundarySelectionQuery,
    FixtureIdentityVerifier, IdentityVerifier,
};

/// Parameter object bundling the port implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub search: Arc<dyn BoundarySearchQuery>,
    pub selection: Arc<dyn BoundarySelectionCommand>,
    pub selection_query: Arc<dyn BoundarySelectionQuery>,
    pub identity: Arc<dyn IdentityVerifier>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            search: Arc::new(FixtureBoundarySearchQuery),
            selection: Arc::new(FixtureBoundarySelectionCommand),
            selection_query: Arc::new(FixtureBoundarySelectionQuery),
            identity: Arc::new(FixtureIdentityVerifier),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub search: Arc<dyn BoundarySearchQuery>,
    pub selection: Arc<dyn BoundarySelectionCommand>,
    pub selection_query: Arc<dyn BoundarySelectionQuery>,
    pub identity: Arc<dyn IdentityVerifier>,
    /// Result limit applied when a search omits `limit`.
    pub default_result_limit: usize,
}

impl HttpState {
    /// # Examples
    /// ```
    /// use city_boundaries::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::default());
    /// assert_eq!(state.default_result_limit, 5);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            search,
            selection,
            selection_query,
            identity,
        } = ports;
        Self {
            search,
            selection,
            selection_query,
            identity,
            default_result_limit: DEFAULT_RESULT_LIMIT,
        }
    }

    #[must_use]
    pub fn with_default_result_limit(mut self, limit: usize) -> Self {
        self.default_result_limit = limit;
        self
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
