//! Driven port for verifying caller credentials.
//!
//! The login flow itself lives with an external identity provider; this
//! service only asks it who a bearer token belongs to.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::UserId;

define_port_error! {
    /// Errors raised while verifying a credential.
    pub enum IdentityVerifierError {
        /// The token is missing, expired, or unknown to the provider.
        Rejected { message: String } =>
            "credential rejected: {message}",
        /// The provider could not be reached or answered unexpectedly.
        Unavailable { message: String } =>
            "identity provider unavailable: {message}",
    }
}

/// Port mapping a bearer token to the caller's identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, bearer_token: &str) -> Result<UserId, IdentityVerifierError>;
}

/// Identity used by [`FixtureIdentityVerifier`] for every accepted token.
pub const FIXTURE_USER_ID: &str = "fixture-user";

/// Fixture verifier accepting any non-blank token.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureIdentityVerifier;

#[async_trait]
impl IdentityVerifier for FixtureIdentityVerifier {
    async fn verify(&self, bearer_token: &str) -> Result<UserId, IdentityVerifierError> {
        if bearer_token.trim().is_empty() {
            return Err(IdentityVerifierError::rejected("empty bearer token"));
        }
        UserId::new(FIXTURE_USER_ID).map_err(|err| IdentityVerifierError::unavailable(err.to_string()))
    }
}
