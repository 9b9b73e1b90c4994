//! Validated boundary search parameters.

use crate::domain::TerritoryCode;

use super::BoundaryValidationError;

/// Number of resolved boundaries returned when the caller sets no limit.
pub const DEFAULT_RESULT_LIMIT: usize = 5;
/// Largest accepted result limit.
pub const MAX_RESULT_LIMIT: usize = 20;

/// One boundary search, constructed per request.
///
/// # Examples
/// ```
/// use city_boundaries::domain::BoundarySearchRequest;
///
/// let request = BoundarySearchRequest::new("Springfield", "United States")
///     .expect("non-empty names")
///     .with_result_limit(3)
///     .expect("limit in range");
/// assert_eq!(request.result_limit(), 3);
/// assert!(request.country_code().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundarySearchRequest {
    city_name: String,
    country: String,
    country_code: Option<TerritoryCode>,
    result_limit: usize,
}

impl BoundarySearchRequest {
    /// Validate the city and country names. Both are trimmed.
    pub fn new(
        city_name: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, BoundaryValidationError> {
        let city_name = city_name.into().trim().to_owned();
        if city_name.is_empty() {
            return Err(BoundaryValidationError::EmptyCityName);
        }
        let country = country.into().trim().to_owned();
        if country.is_empty() {
            return Err(BoundaryValidationError::EmptyCountry);
        }
        Ok(Self {
            city_name,
            country,
            country_code: None,
            result_limit: DEFAULT_RESULT_LIMIT,
        })
    }

    /// Use an explicit territory instead of resolving the country name.
    #[must_use]
    pub fn with_country_code(mut self, code: TerritoryCode) -> Self {
        self.country_code = Some(code);
        self
    }

    /// Override the number of results, between 1 and [`MAX_RESULT_LIMIT`].
    pub fn with_result_limit(mut self, limit: usize) -> Result<Self, BoundaryValidationError> {
        if !(1..=MAX_RESULT_LIMIT).contains(&limit) {
            return Err(BoundaryValidationError::ResultLimitOutOfRange {
                limit,
                max: MAX_RESULT_LIMIT,
            });
        }
        self.result_limit = limit;
        Ok(self)
    }

    #[must_use]
    pub fn city_name(&self) -> &str {
        self.city_name.as_str()
    }

    #[must_use]
    pub fn country(&self) -> &str {
        self.country.as_str()
    }

    #[must_use]
    pub fn country_code(&self) -> Option<TerritoryCode> {
        self.country_code
    }

    #[must_use]
    pub fn result_limit(&self) -> usize {
        self.result_limit
    }
}
