//! Bearer token extraction for `/api/v1` handlers.
//!
//! The service performs no authentication of its own. Handlers take an
//! [`AuthenticatedCaller`], which hands the `Authorization` header's bearer
//! token to the configured `IdentityVerifier`.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::ports::IdentityVerifierError;
use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of a caller whose bearer token was verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller(UserId);

impl AuthenticatedCaller {
    pub fn user_id(&self) -> &UserId {
        &self.0
    }

    pub fn into_user_id(self) -> UserId {
        self.0
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<String, Error> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid ASCII"))?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("authorization header must carry a bearer token"))?;
    Ok(token.to_owned())
}

fn map_verifier_error(error: IdentityVerifierError) -> Error {
    match error {
        IdentityVerifierError::Rejected { message } => {
            debug!(%message, "bearer token rejected");
            Error::unauthorized("invalid bearer token")
        }
        IdentityVerifierError::Unavailable { message } => {
            warn!(%message, "identity provider unavailable");
            Error::service_unavailable("identity provider unavailable")
        }
    }
}

impl FromRequest for AuthenticatedCaller {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered on the app"))?;
            let user_id = state
                .identity
                .verify(&token)
                .await
                .map_err(map_verifier_error)?;
            Ok(Self(user_id))
        })
    }
}
