//! Relevance scoring and ranking of boundary candidates.
//!
//! Scores are additive and only meaningful relative to each other. The
//! country-mismatch penalty is larger than any single bonus, so a boundary
//! from the wrong country never outranks a matching one on name alone.
//!
//! | Signal                                            | Points          |
//! |---------------------------------------------------|-----------------|
//! | `boundary=administrative` / `political`           | +10 / +8        |
//! | `admin_level` 6, 7, 8, 9, 10                      | +4 … +12        |
//! | `admin_level` 1 to 4                              | −10             |
//! | `place=city` / `municipality` / `town`            | +8 / +6 / +4    |
//! | `name` exact / contains (case-insensitive)        | +20 / +8        |
//! | best alternate name exact / contains              | +10 / +4        |
//! | bounding box between 1 and 25 000 km²             | +5              |
//! | `population` tag present                          | +3              |
//! | element is a relation                             | +3              |
//! | country tag disagrees with requested territory    | −50             |

use std::cmp::Ordering;

use crate::domain::{ElementKind, RawFeature, ScoredCandidate, Tags, TerritoryCode};

pub const ADMINISTRATIVE_BONUS: f64 = 10.0;
pub const POLITICAL_BONUS: f64 = 8.0;
pub const BROAD_ADMIN_LEVEL_PENALTY: f64 = -10.0;
pub const PLACE_CITY_BONUS: f64 = 8.0;
pub const PLACE_MUNICIPALITY_BONUS: f64 = 6.0;
pub const PLACE_TOWN_BONUS: f64 = 4.0;
pub const NAME_EXACT_BONUS: f64 = 20.0;
pub const NAME_CONTAINS_BONUS: f64 = 8.0;
pub const ALT_NAME_EXACT_BONUS: f64 = 10.0;
pub const ALT_NAME_CONTAINS_BONUS: f64 = 4.0;
pub const PLAUSIBLE_SIZE_BONUS: f64 = 5.0;
pub const POPULATION_BONUS: f64 = 3.0;
pub const RELATION_BONUS: f64 = 3.0;
pub const COUNTRY_MISMATCH_PENALTY: f64 = -50.0;

/// Bounding-box areas (km²) that plausibly belong to a city.
pub const PLAUSIBLE_AREA_SQ_KM: std::ops::RangeInclusive<f64> = 1.0..=25_000.0;

const ALTERNATE_NAME_KEYS: [&str; 4] = ["alt_name", "official_name", "short_name", "name:en"];
const COUNTRY_KEYS: [&str; 4] = [
    "ISO3166-1",
    "ISO3166-1:alpha2",
    "is_in:country_code",
    "addr:country",
];

/// Inputs that stay fixed for every candidate of one search.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub search_term: &'a str,
    pub territory: TerritoryCode,
}

/// Score one candidate.
///
/// Pure and deterministic.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use city_boundaries::domain::{ElementKind, ScoringContext, score_candidate};
///
/// let tags = BTreeMap::from([
///     ("boundary".to_owned(), "administrative".to_owned()),
///     ("admin_level".to_owned(), "8".to_owned()),
///     ("name".to_owned(), "Springfield".to_owned()),
/// ]);
/// let context = ScoringContext {
///     search_term: "springfield",
///     territory: "US".parse().expect("valid code"),
/// };
/// let score = score_candidate(&tags, ElementKind::Relation, 0.0, &context);
/// assert_eq!(score, 10.0 + 8.0 + 20.0 + 3.0);
/// ```
#[must_use]
pub fn score_candidate(
    tags: &Tags,
    kind: ElementKind,
    bounding_box_area_sq_km: f64,
    context: &ScoringContext<'_>,
) -> f64 {
    let term = normalise(context.search_term);
    let tag = |key: &str| tags.get(key).map(String::as_str);

    let mut score = boundary_kind_score(tag("boundary"))
        + admin_level_score(tag("admin_level"))
        + place_score(tag("place"))
        + name_score(tag("name"), &term, NAME_EXACT_BONUS, NAME_CONTAINS_BONUS)
        + alternate_name_score(tags, &term);

    if PLAUSIBLE_AREA_SQ_KM.contains(&bounding_box_area_sq_km) {
        score += PLAUSIBLE_SIZE_BONUS;
    }
    if tag("population").is_some_and(|value| !value.trim().is_empty()) {
        score += POPULATION_BONUS;
    }
    if kind == ElementKind::Relation {
        score += RELATION_BONUS;
    }
    if country_disagrees(tags, context.territory) {
        score += COUNTRY_MISMATCH_PENALTY;
    }
    score
}

/// Score every feature, order by score descending and keep the best `limit`.
///
/// The sort is stable: equal scores keep their upstream order.
#[must_use]
pub fn rank_candidates(
    features: Vec<RawFeature>,
    context: &ScoringContext<'_>,
    limit: usize,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = features
        .into_iter()
        .map(|feature| {
            let area = feature.bounding_box_area_sq_km();
            let score = score_candidate(&feature.tags, feature.id.kind(), area, context);
            ScoredCandidate::new(feature, area, score)
        })
        .collect();
    scored.sort_by(|a, b| descending(a.score(), b.score()));
    scored.truncate(limit);
    scored
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

fn normalise(value: &str) -> String {
    value.trim().to_lowercase()
}

fn boundary_kind_score(value: Option<&str>) -> f64 {
    match value {
        Some("administrative") => ADMINISTRATIVE_BONUS,
        Some("political") => POLITICAL_BONUS,
        _ => 0.0,
    }
}

fn admin_level_score(value: Option<&str>) -> f64 {
    match value.and_then(|raw| raw.trim().parse::<u8>().ok()) {
        Some(level @ 6..=10) => 4.0 + 2.0 * f64::from(level - 6),
        Some(1..=4) => BROAD_ADMIN_LEVEL_PENALTY,
        _ => 0.0,
    }
}

fn place_score(value: Option<&str>) -> f64 {
    match value {
        Some("city") => PLACE_CITY_BONUS,
        Some("municipality") => PLACE_MUNICIPALITY_BONUS,
        Some("town") => PLACE_TOWN_BONUS,
        _ => 0.0,
    }
}

fn name_score(value: Option<&str>, term: &str, exact: f64, contains: f64) -> f64 {
    let Some(name) = value.map(normalise) else {
        return 0.0;
    };
    if term.is_empty() || name.is_empty() {
        0.0
    } else if name == term {
        exact
    } else if name.contains(term) {
        contains
    } else {
        0.0
    }
}

/// Best match across alternate names; `alt_name` may hold `;`-separated values.
fn alternate_name_score(tags: &Tags, term: &str) -> f64 {
    ALTERNATE_NAME_KEYS
        .iter()
        .filter_map(|key| tags.get(*key))
        .flat_map(|value| value.split(';'))
        .map(|name| {
            name_score(
                Some(name),
                term,
                ALT_NAME_EXACT_BONUS,
                ALT_NAME_CONTAINS_BONUS,
            )
        })
        .fold(0.0, f64::max)
}

fn country_disagrees(tags: &Tags, territory: TerritoryCode) -> bool {
    let direct = COUNTRY_KEYS
        .iter()
        .filter_map(|key| tags.get(*key))
        .filter_map(|value| value.parse::<TerritoryCode>().ok());
    // ISO3166-2 subdivision codes start with the country code, e.g. "US-IL".
    let subdivision = tags
        .get("ISO3166-2")
        .and_then(|value| value.split('-').next())
        .and_then(|prefix| prefix.parse::<TerritoryCode>().ok());

    direct.chain(subdivision).any(|code| code != territory)
}
