//! Caller identity as reported by the external identity provider.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted user identifier.
pub const USER_ID_MAX: usize = 128;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdValidationError {
    #[error("user id must not be empty")]
    Empty,
    #[error("user id must be at most {max} characters without surrounding whitespace")]
    Invalid { max: usize },
}

/// Opaque identifier issued by the identity provider.
///
/// # Examples
/// ```
/// use city_boundaries::domain::UserId;
///
/// let id = UserId::new("user-17").expect("valid id");
/// assert_eq!(id.as_ref(), "user-17");
/// assert!(UserId::new(" ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        if id.trim() != id || id.chars().count() > USER_ID_MAX {
            return Err(UserIdValidationError::Invalid { max: USER_ID_MAX });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}
