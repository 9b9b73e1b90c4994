//! Overpass QL query text for the two boundary query shapes.
//!
//! Both builders are deterministic. City names are regex-escaped before being
//! embedded in a name pattern, then escaped again for the quoted literal.

use crate::domain::ports::BoundarySourceError;
use crate::domain::{CompositeId, TerritoryCode};

const BOUNDARY_FILTER: &str = r#"["boundary"~"^(administrative|political)$"]"#;
const PLACE_FILTER: &str = r#"["place"~"^(city|town|municipality)$"]"#;
const SEARCH_AREA: &str = "searchArea";

/// Stage-one query: tagged candidates with bounding boxes, no geometry.
pub(super) fn build_candidate_query(
    city_name: &str,
    territory: TerritoryCode,
    timeout_seconds: u32,
) -> Result<String, BoundarySourceError> {
    let trimmed = city_name.trim();
    if trimmed.is_empty() {
        return Err(BoundarySourceError::invalid_request(
            "city name must not be blank",
        ));
    }
    let pattern = escape_quoted(&regex::escape(trimmed));
    let name_filter = format!(r#"["name"~"{pattern}",i]"#);

    let mut lines = Vec::with_capacity(4);
    for kind_filter in [BOUNDARY_FILTER, PLACE_FILTER] {
        for element_type in ["relation", "way"] {
            lines.push(format!(
                "  {element_type}{kind_filter}{name_filter}(area.{SEARCH_AREA});"
            ));
        }
    }

    Ok(format!(
        "[out:json][timeout:{timeout_seconds}];\n\
         area[\"ISO3166-1\"=\"{territory}\"][admin_level=2]->.{SEARCH_AREA};\n\
         (\n{query_lines}\n);\n\
         out tags bb;",
        territory = escape_quoted(territory.as_str()),
        query_lines = lines.join("\n"),
    ))
}

/// Stage-two query: one element plus its member ways and nodes.
pub(super) fn build_geometry_query(id: CompositeId, timeout_seconds: u32) -> String {
    format!(
        "[out:json][timeout:{timeout_seconds}];\n{kind}({external_id});\n(._;>;);\nout body;",
        kind = id.kind(),
        external_id = id.external_id(),
    )
}

pub(super) fn escape_quoted(raw: &str) -> String {
    raw.replace('\\', r"\\").replace('"', "\\\"")
}
