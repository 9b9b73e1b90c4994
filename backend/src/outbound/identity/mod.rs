//! Identity provider adapters.
//!
//! `HttpIdentityVerifier` implements the `IdentityVerifier` port by asking an
//! external session endpoint who a bearer token belongs to.

mod http_verifier;

pub use http_verifier::HttpIdentityVerifier;
