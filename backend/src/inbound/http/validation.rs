//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{CityId, CompositeId, Error, TerritoryCode};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidCountryCode,
    InvalidCompositeId,
    InvalidCityId,
    InvalidLimit,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidCountryCode => "invalid_country_code",
            ErrorCode::InvalidCompositeId => "invalid_composite_id",
            ErrorCode::InvalidCityId => "invalid_city_id",
            ErrorCode::InvalidLimit => "invalid_limit",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

/// Require a present, non-blank text field.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_country_code(value: &str, field: FieldName) -> Result<TerritoryCode, Error> {
    value.parse().map_err(|_| {
        let name = field.as_str();
        ValidationError::new(name, format!("{name} must be a two-letter ISO 3166-1 code"))
            .with_value(ErrorCode::InvalidCountryCode, value)
    })
}

pub(crate) fn parse_composite_id(value: &str, field: FieldName) -> Result<CompositeId, Error> {
    value.parse().map_err(|_| {
        let name = field.as_str();
        ValidationError::new(name, format!("{name} must look like \"relation/<id>\""))
            .with_value(ErrorCode::InvalidCompositeId, value)
    })
}

pub(crate) fn parse_city_id(value: String, field: FieldName) -> Result<CityId, Error> {
    CityId::new(value.clone()).map_err(|error| {
        ValidationError::new(field.as_str(), error.to_string())
            .with_value(ErrorCode::InvalidCityId, value)
    })
}

pub(crate) fn invalid_limit_error(field: FieldName, value: &str, max: usize) -> Error {
    let name = field.as_str();
    ValidationError::new(name, format!("{name} must be an integer between 1 and {max}"))
        .with_value(ErrorCode::InvalidLimit, value)
}
