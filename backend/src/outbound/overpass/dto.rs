//! DTOs for decoding Overpass JSON responses.
//!
//! Both query shapes return the same `elements` envelope. Candidate searches
//! map into `RawFeature` records; geometry fetches map into an
//! `ElementGraph` keyed by element identifier.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::ports::{ElementGraph, MemberKind, RawRelation, RawWay, RelationMember};
use crate::domain::{BoundingBox, CompositeId, Coordinate, ElementKind, RawFeature};

#[derive(Debug, Deserialize)]
pub(super) struct OverpassResponseDto {
    #[serde(default)]
    pub(super) elements: Vec<OverpassElementDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassElementDto {
    #[serde(rename = "type")]
    pub(super) element_type: String,
    pub(super) id: i64,
    pub(super) lon: Option<f64>,
    pub(super) lat: Option<f64>,
    pub(super) bounds: Option<OverpassBoundsDto>,
    #[serde(default)]
    pub(super) nodes: Vec<i64>,
    #[serde(default)]
    pub(super) members: Vec<OverpassMemberDto>,
    #[serde(default)]
    pub(super) tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassBoundsDto {
    pub(super) minlat: f64,
    pub(super) minlon: f64,
    pub(super) maxlat: f64,
    pub(super) maxlon: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct OverpassMemberDto {
    #[serde(rename = "type")]
    pub(super) member_type: String,
    #[serde(rename = "ref")]
    pub(super) reference: i64,
    #[serde(default)]
    pub(super) role: String,
}

impl OverpassResponseDto {
    /// Candidate features in upstream order; nodes and areas are skipped.
    pub(super) fn into_features(self) -> Vec<RawFeature> {
        self.elements
            .into_iter()
            .filter_map(OverpassElementDto::into_feature)
            .collect()
    }

    pub(super) fn into_element_graph(self) -> Result<ElementGraph, String> {
        let mut graph = ElementGraph::default();
        for element in self.elements {
            match element.element_type.as_str() {
                "node" => {
                    let coordinate = element.coordinate()?;
                    graph.nodes.insert(element.id, coordinate);
                }
                "way" => {
                    graph.ways.insert(
                        element.id,
                        RawWay {
                            node_ids: element.nodes,
                            tags: element.tags,
                        },
                    );
                }
                "relation" => {
                    let members = element
                        .members
                        .into_iter()
                        .map(OverpassMemberDto::into_member)
                        .collect::<Result<Vec<_>, _>>()?;
                    graph.relations.insert(
                        element.id,
                        RawRelation {
                            members,
                            tags: element.tags,
                        },
                    );
                }
                other => {
                    return Err(format!(
                        "element {} has unsupported type {other}",
                        element.id
                    ));
                }
            }
        }
        Ok(graph)
    }
}

impl OverpassElementDto {
    fn into_feature(self) -> Option<RawFeature> {
        let kind = match self.element_type.as_str() {
            "way" => ElementKind::Way,
            "relation" => ElementKind::Relation,
            _ => return None,
        };
        let bounding_box = self.bounds.map(|bounds| BoundingBox {
            min_lat: bounds.minlat,
            min_lon: bounds.minlon,
            max_lat: bounds.maxlat,
            max_lon: bounds.maxlon,
        });
        Some(RawFeature {
            id: CompositeId::new(kind, self.id),
            tags: self.tags,
            bounding_box,
        })
    }

    fn coordinate(&self) -> Result<Coordinate, String> {
        let (Some(longitude), Some(latitude)) = (self.lon, self.lat) else {
            return Err(format!("node {} missing coordinates", self.id));
        };
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(format!("node {} includes non-finite coordinates", self.id));
        }
        Ok(Coordinate::new(longitude, latitude))
    }
}

impl OverpassMemberDto {
    fn into_member(self) -> Result<RelationMember, String> {
        let kind = match self.member_type.as_str() {
            "node" => MemberKind::Node,
            "way" => MemberKind::Way,
            "relation" => MemberKind::Relation,
            other => return Err(format!("member {} has unsupported type {other}", self.reference)),
        };
        Ok(RelationMember {
            kind,
            id: self.reference,
            role: self.role,
        })
    }
}
