//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod boundaries;
pub mod boundary_body;
pub mod error;
pub mod health;
pub mod schemas;
pub mod selections;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
