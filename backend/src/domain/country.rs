//! Country-name to ISO 3166-1 alpha-2 territory lookup.
//!
//! Lookups try an exact match first and then a case-insensitive match on the
//! trimmed input. Unknown names fail; there is no fallback territory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Two-letter upper-case ISO 3166-1 alpha-2 code.
///
/// # Examples
/// ```
/// use city_boundaries::domain::TerritoryCode;
///
/// let code: TerritoryCode = "us".parse().expect("two ASCII letters");
/// assert_eq!(code.as_str(), "US");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TerritoryCode([u8; 2]);

/// Reasons a territory code fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("territory code must be exactly two ASCII letters, got {value:?}")]
pub struct TerritoryCodeError {
    value: String,
}

impl TerritoryCode {
    /// Upper-case textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Both bytes are validated ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl FromStr for TerritoryCode {
    type Err = TerritoryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Ok(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => Err(TerritoryCodeError {
                value: s.to_owned(),
            }),
        }
    }
}

impl TryFrom<String> for TerritoryCode {
    type Error = TerritoryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TerritoryCode> for String {
    fn from(value: TerritoryCode) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for TerritoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a country name has no entry in the lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown country: {name}")]
pub struct UnknownCountry {
    /// Name as supplied by the caller.
    pub name: String,
}

/// Country names (and common aliases) mapped to alpha-2 codes.
const COUNTRIES: &[(&str, &str)] = &[
    ("Afghanistan", "AF"),
    ("Albania", "AL"),
    ("Algeria", "DZ"),
    ("Andorra", "AD"),
    ("Angola", "AO"),
    ("Argentina", "AR"),
    ("Armenia", "AM"),
    ("Australia", "AU"),
    ("Austria", "AT"),
    ("Azerbaijan", "AZ"),
    ("Bahamas", "BS"),
    ("Bahrain", "BH"),
    ("Bangladesh", "BD"),
    ("Belarus", "BY"),
    ("Belgium", "BE"),
    ("Belize", "BZ"),
    ("Benin", "BJ"),
    ("Bhutan", "BT"),
    ("Bolivia", "BO"),
    ("Bosnia and Herzegovina", "BA"),
    ("Botswana", "BW"),
    ("Brazil", "BR"),
    ("Brasil", "BR"),
    ("Bulgaria", "BG"),
    ("Burkina Faso", "BF"),
    ("Cambodia", "KH"),
    ("Cameroon", "CM"),
    ("Canada", "CA"),
    ("Chile", "CL"),
    ("China", "CN"),
    ("Colombia", "CO"),
    ("Costa Rica", "CR"),
    ("Côte d'Ivoire", "CI"),
    ("Ivory Coast", "CI"),
    ("Croatia", "HR"),
    ("Cuba", "CU"),
    ("Cyprus", "CY"),
    ("Czechia", "CZ"),
    ("Czech Republic", "CZ"),
    ("Democratic Republic of the Congo", "CD"),
    ("Denmark", "DK"),
    ("Dominican Republic", "DO"),
    ("Ecuador", "EC"),
    ("Egypt", "EG"),
    ("El Salvador", "SV"),
    ("Estonia", "EE"),
    ("Ethiopia", "ET"),
    ("Fiji", "FJ"),
    ("Finland", "FI"),
    ("France", "FR"),
    ("Georgia", "GE"),
    ("Germany", "DE"),
    ("Deutschland", "DE"),
    ("Ghana", "GH"),
    ("Greece", "GR"),
    ("Guatemala", "GT"),
    ("Honduras", "HN"),
    ("Hungary", "HU"),
    ("Iceland", "IS"),
    ("India", "IN"),
    ("Indonesia", "ID"),
    ("Iran", "IR"),
    ("Iraq", "IQ"),
    ("Ireland", "IE"),
    ("Israel", "IL"),
    ("Italy", "IT"),
    ("Jamaica", "JM"),
    ("Japan", "JP"),
    ("Jordan", "JO"),
    ("Kazakhstan", "KZ"),
    ("Kenya", "KE"),
    ("Kuwait", "KW"),
    ("Latvia", "LV"),
    ("Lebanon", "LB"),
    ("Lithuania", "LT"),
    ("Luxembourg", "LU"),
    ("Madagascar", "MG"),
    ("Malaysia", "MY"),
    ("Mali", "ML"),
    ("Malta", "MT"),
    ("Mexico", "MX"),
    ("México", "MX"),
    ("Moldova", "MD"),
    ("Mongolia", "MN"),
    ("Montenegro", "ME"),
    ("Morocco", "MA"),
    ("Mozambique", "MZ"),
    ("Myanmar", "MM"),
    ("Namibia", "NA"),
    ("Nepal", "NP"),
    ("Netherlands", "NL"),
    ("The Netherlands", "NL"),
    ("New Zealand", "NZ"),
    ("Nicaragua", "NI"),
    ("Niger", "NE"),
    ("Nigeria", "NG"),
    ("North Macedonia", "MK"),
    ("Norway", "NO"),
    ("Oman", "OM"),
    ("Pakistan", "PK"),
    ("Panama", "PA"),
    ("Paraguay", "PY"),
    ("Peru", "PE"),
    ("Philippines", "PH"),
    ("Poland", "PL"),
    ("Portugal", "PT"),
    ("Qatar", "QA"),
    ("Romania", "RO"),
    ("Russia", "RU"),
    ("Russian Federation", "RU"),
    ("Rwanda", "RW"),
    ("Saudi Arabia", "SA"),
    ("Senegal", "SN"),
    ("Serbia", "RS"),
    ("Singapore", "SG"),
    ("Slovakia", "SK"),
    ("Slovenia", "SI"),
    ("South Africa", "ZA"),
    ("South Korea", "KR"),
    ("Republic of Korea", "KR"),
    ("Spain", "ES"),
    ("España", "ES"),
    ("Sri Lanka", "LK"),
    ("Sudan", "SD"),
    ("Sweden", "SE"),
    ("Switzerland", "CH"),
    ("Taiwan", "TW"),
    ("Tanzania", "TZ"),
    ("Thailand", "TH"),
    ("Tunisia", "TN"),
    ("Turkey", "TR"),
    ("Türkiye", "TR"),
    ("Uganda", "UG"),
    ("Ukraine", "UA"),
    ("United Arab Emirates", "AE"),
    ("United Kingdom", "GB"),
    ("UK", "GB"),
    ("Great Britain", "GB"),
    ("United States", "US"),
    ("United States of America", "US"),
    ("USA", "US"),
    ("Uruguay", "UY"),
    ("Uzbekistan", "UZ"),
    ("Venezuela", "VE"),
    ("Vietnam", "VN"),
    ("Viet Nam", "VN"),
    ("Yemen", "YE"),
    ("Zambia", "ZM"),
    ("Zimbabwe", "ZW"),
];

/// Resolve a free-text country name to its territory code.
///
/// # Examples
/// ```
/// use city_boundaries::domain::resolve_country;
///
/// let code = resolve_country("united states").expect("known country");
/// assert_eq!(code.as_str(), "US");
/// assert!(resolve_country("Atlantis").is_err());
/// ```
pub fn resolve_country(name: &str) -> Result<TerritoryCode, UnknownCountry> {
    let unknown = || UnknownCountry {
        name: name.to_owned(),
    };
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(unknown());
    }

    let code = COUNTRIES
        .iter()
        .find(|(candidate, _)| *candidate == trimmed)
        .or_else(|| {
            let folded = trimmed.to_lowercase();
            COUNTRIES
                .iter()
                .find(|(candidate, _)| candidate.to_lowercase() == folded)
        })
        .map(|(_, code)| *code)
        .ok_or_else(unknown)?;

    code.parse().map_err(|_| unknown())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("United States", "US")]
    #[case("united states", "US")]
    #[case("  GERMANY ", "DE")]
    #[case("México", "MX")]
    #[case("méxico", "MX")]
    #[case("UK", "GB")]
    fn resolves_known_names(#[case] name: &str, #[case] expected: &str) {
        let code = resolve_country(name).expect("known country");
        assert_eq!(code.as_str(), expected);
    }

    #[rstest]
    #[case("Atlantis")]
    #[case("")]
    #[case("   ")]
    fn rejects_unknown_names(#[case] name: &str) {
        let err = resolve_country(name).expect_err("unknown country");
        assert_eq!(err.name, name);
    }

    #[test]
    fn every_table_entry_is_a_valid_code() {
        for (name, code) in COUNTRIES {
            assert!(
                code.parse::<TerritoryCode>().is_ok(),
                "{name} maps to invalid code {code}"
            );
        }
    }

    #[rstest]
    #[case("de", "DE")]
    #[case(" Us ", "US")]
    fn territory_codes_normalise_case(#[case] raw: &str, #[case] expected: &str) {
        let code: TerritoryCode = raw.parse().expect("valid code");
        assert_eq!(code.to_string(), expected);
    }

    #[rstest]
    #[case("USA")]
    #[case("U")]
    #[case("1A")]
    fn territory_codes_reject_bad_shapes(#[case] raw: &str) {
        assert!(raw.parse::<TerritoryCode>().is_err());
    }
}
