//! Polygon assembly from fetched way and node primitives.
//!
//! A way becomes one ring, closed by repeating its first node when needed.
//! A relation contributes its `outer` (or role-less) member ways; those are
//! joined end to end on shared nodes, reversing members as required, until
//! every chain closes. A chain that cannot close fails the whole element so
//! callers never see a partial outline.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{BoundarySource, ElementGraph, MemberKind, RelationMember};
use crate::domain::{
    BoundaryGeometry, BoundaryResolutionError, CompositeId, Coordinate, ElementKind, RawFeature,
    ResolvedBoundary, Ring, ScoredCandidate, Tags,
};

/// Relation member roles that contribute to the outer outline.
const OUTER_ROLES: [&str; 2] = ["outer", ""];

/// Fetches one element's primitives and assembles its outline.
pub struct GeometryResolver<S> {
    source: Arc<S>,
}

impl<S> Clone for GeometryResolver<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S> GeometryResolver<S>
where
    S: BoundarySource,
{
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Resolve the geometry of one element.
    ///
    /// Source failures map to [`BoundaryResolutionError::UpstreamUnavailable`];
    /// assembly failures to `GeometryResolutionFailed` or `MalformedGeometry`.
    pub async fn resolve_geometry(
        &self,
        id: CompositeId,
    ) -> Result<BoundaryGeometry, BoundaryResolutionError> {
        let graph = self.fetch(id).await?;
        assemble_geometry(&graph, id)
    }

    /// Resolve a boundary from its reference alone.
    ///
    /// Tags come from the fetched element itself. No search context exists,
    /// so the score is zero.
    pub async fn resolve_boundary(
        &self,
        id: CompositeId,
    ) -> Result<ResolvedBoundary, BoundaryResolutionError> {
        let graph = self.fetch(id).await?;
        let geometry = assemble_geometry(&graph, id)?;
        let tags = element_tags(&graph, id);
        let feature = RawFeature {
            id,
            tags,
            bounding_box: None,
        };
        Ok(ResolvedBoundary::new(
            ScoredCandidate::new(feature, 0.0, 0.0),
            geometry,
        ))
    }

    async fn fetch(&self, id: CompositeId) -> Result<ElementGraph, BoundaryResolutionError> {
        let graph = self
            .source
            .fetch_element_graph(id)
            .await
            .map_err(|err| BoundaryResolutionError::upstream_unavailable(err.to_string()))?;
        debug!(
            composite_id = %id,
            nodes = graph.nodes.len(),
            ways = graph.ways.len(),
            relations = graph.relations.len(),
            "element graph fetched"
        );
        Ok(graph)
    }
}

fn element_tags(graph: &ElementGraph, id: CompositeId) -> Tags {
    let tags = match id.kind() {
        ElementKind::Way => graph.ways.get(&id.external_id()).map(|way| &way.tags),
        ElementKind::Relation => graph
            .relations
            .get(&id.external_id())
            .map(|relation| &relation.tags),
    };
    tags.cloned().unwrap_or_default()
}

/// Assemble the outline of `id` from an already fetched element graph.
pub fn assemble_geometry(
    graph: &ElementGraph,
    id: CompositeId,
) -> Result<BoundaryGeometry, BoundaryResolutionError> {
    match id.kind() {
        ElementKind::Way => assemble_way(graph, id),
        ElementKind::Relation => assemble_relation(graph, id),
    }
}

fn assemble_way(
    graph: &ElementGraph,
    id: CompositeId,
) -> Result<BoundaryGeometry, BoundaryResolutionError> {
    let node_ids = way_nodes(graph, id, id.external_id())?;
    let points = coordinates(graph, id, node_ids)?;
    let ring = Ring::close(points)
        .map_err(|err| BoundaryResolutionError::malformed_geometry(id, err.to_string()))?;
    Ok(BoundaryGeometry::Polygon(ring))
}

fn assemble_relation(
    graph: &ElementGraph,
    id: CompositeId,
) -> Result<BoundaryGeometry, BoundaryResolutionError> {
    let relation = graph.relations.get(&id.external_id()).ok_or_else(|| {
        BoundaryResolutionError::geometry_resolution_failed(id, "relation missing from response")
    })?;

    let chains = relation
        .members
        .iter()
        .filter(|member| is_outer_way(member))
        .map(|member| way_nodes(graph, id, member.id).map(<[i64]>::to_vec))
        .collect::<Result<Vec<_>, _>>()?;
    if chains.is_empty() {
        return Err(BoundaryResolutionError::geometry_resolution_failed(
            id,
            "relation has no outer member ways",
        ));
    }

    let rings = join_chains(chains)
        .map_err(|message| BoundaryResolutionError::malformed_geometry(id, message))?
        .into_iter()
        .map(|node_ids| {
            let points = coordinates(graph, id, &node_ids)?;
            Ring::new(points)
                .map_err(|err| BoundaryResolutionError::malformed_geometry(id, err.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    BoundaryGeometry::from_rings(rings)
        .map_err(|err| BoundaryResolutionError::geometry_resolution_failed(id, err.to_string()))
}

fn is_outer_way(member: &RelationMember) -> bool {
    member.kind == MemberKind::Way && OUTER_ROLES.contains(&member.role.as_str())
}

fn way_nodes<'a>(
    graph: &'a ElementGraph,
    id: CompositeId,
    way_id: i64,
) -> Result<&'a [i64], BoundaryResolutionError> {
    graph
        .ways
        .get(&way_id)
        .map(|way| way.node_ids.as_slice())
        .ok_or_else(|| {
            BoundaryResolutionError::geometry_resolution_failed(
                id,
                format!("way {way_id} missing from response"),
            )
        })
}

fn coordinates(
    graph: &ElementGraph,
    id: CompositeId,
    node_ids: &[i64],
) -> Result<Vec<Coordinate>, BoundaryResolutionError> {
    node_ids
        .iter()
        .map(|node_id| {
            graph.nodes.get(node_id).copied().ok_or_else(|| {
                BoundaryResolutionError::geometry_resolution_failed(
                    id,
                    format!("node {node_id} missing from response"),
                )
            })
        })
        .collect()
}

fn is_closed(chain: &[i64]) -> bool {
    chain.len() > 1 && chain.first() == chain.last()
}

/// Join node chains on shared endpoints into closed node rings.
fn join_chains(chains: Vec<Vec<i64>>) -> Result<Vec<Vec<i64>>, String> {
    let mut pending: VecDeque<Vec<i64>> = chains.into_iter().filter(|c| !c.is_empty()).collect();
    let mut rings = Vec::new();

    while let Some(mut current) = pending.pop_front() {
        while !is_closed(&current) {
            let Some(&tail) = current.last() else {
                return Err("empty member way".to_owned());
            };
            let touches = |chain: &Vec<i64>| {
                chain.first() == Some(&tail) || chain.last() == Some(&tail)
            };
            // A closed chain touching the tail is its own ring; splicing it in
            // would fold two rings into a figure eight.
            let position = pending
                .iter()
                .position(|chain| touches(chain) && !is_closed(chain))
                .or_else(|| pending.iter().position(touches));
            let Some(mut next) = position.and_then(|index| pending.remove(index)) else {
                return Err(format!("outer chain ending at node {tail} cannot be closed"));
            };
            if next.first() != Some(&tail) {
                next.reverse();
            }
            current.extend(next.into_iter().skip(1));
        }
        rings.push(current);
    }
    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        BoundarySourceError, MockBoundarySource, RawRelation, RawWay,
    };
    use rstest::{fixture, rstest};

    const RELATION_ID: i64 = 900;

    fn relation_id() -> CompositeId {
        CompositeId::new(ElementKind::Relation, RELATION_ID)
    }

    fn way(node_ids: &[i64]) -> RawWay {
        RawWay {
            node_ids: node_ids.to_vec(),
            tags: Default::default(),
        }
    }

    fn member(kind: MemberKind, id: i64, role: &str) -> RelationMember {
        RelationMember {
            kind,
            id,
            role: role.to_owned(),
        }
    }

    /// Nodes 1-4 form a unit square; nodes 11-13 a triangle far away.
    #[fixture]
    fn graph() -> ElementGraph {
        let mut graph = ElementGraph::default();
        for (id, lon, lat) in [
            (1, 0.0, 0.0),
            (2, 1.0, 0.0),
            (3, 1.0, 1.0),
            (4, 0.0, 1.0),
            (11, 10.0, 10.0),
            (12, 11.0, 10.0),
            (13, 10.5, 11.0),
        ] {
            graph.nodes.insert(id, Coordinate::new(lon, lat));
        }
        graph
    }

    fn with_relation(mut graph: ElementGraph, members: Vec<RelationMember>) -> ElementGraph {
        graph.relations.insert(
            RELATION_ID,
            RawRelation {
                members,
                tags: Default::default(),
            },
        );
        graph
    }

    #[rstest]
    fn open_way_is_closed_with_its_first_point(mut graph: ElementGraph) {
        graph.ways.insert(50, way(&[1, 2, 3, 4]));
        let geometry =
            assemble_geometry(&graph, CompositeId::new(ElementKind::Way, 50)).expect("resolves");

        let BoundaryGeometry::Polygon(ring) = geometry else {
            panic!("expected polygon");
        };
        assert_eq!(ring.points().len(), 5);
        assert_eq!(ring.points().first(), ring.points().last());
    }

    #[rstest]
    fn way_with_two_distinct_points_is_malformed(mut graph: ElementGraph) {
        graph.ways.insert(50, way(&[1, 2, 1]));
        let result = assemble_geometry(&graph, CompositeId::new(ElementKind::Way, 50));
        assert!(matches!(
            result,
            Err(BoundaryResolutionError::MalformedGeometry { .. })
        ));
    }

    #[rstest]
    fn relation_joins_members_reversing_as_needed(mut graph: ElementGraph) {
        graph.ways.insert(50, way(&[1, 2, 3]));
        // Runs against the first member's direction.
        graph.ways.insert(51, way(&[1, 4, 3]));
        let graph = with_relation(
            graph,
            vec![
                member(MemberKind::Way, 50, "outer"),
                member(MemberKind::Way, 51, ""),
                member(MemberKind::Node, 4, "admin_centre"),
            ],
        );

        let geometry = assemble_geometry(&graph, relation_id()).expect("resolves");
        let BoundaryGeometry::Polygon(ring) = geometry else {
            panic!("expected polygon");
        };
        let expected: Vec<Coordinate> = [1, 2, 3, 4, 1]
            .iter()
            .map(|id| graph.nodes[id])
            .collect();
        assert_eq!(ring.points(), expected.as_slice());
    }

    #[rstest]
    fn disjoint_outer_rings_form_a_multipolygon(mut graph: ElementGraph) {
        graph.ways.insert(50, way(&[1, 2, 3, 4, 1]));
        graph.ways.insert(60, way(&[11, 12]));
        graph.ways.insert(61, way(&[12, 13, 11]));
        let graph = with_relation(
            graph,
            vec![
                member(MemberKind::Way, 50, "outer"),
                member(MemberKind::Way, 60, "outer"),
                member(MemberKind::Way, 61, "outer"),
            ],
        );

        let geometry = assemble_geometry(&graph, relation_id()).expect("resolves");
        assert!(matches!(geometry, BoundaryGeometry::MultiPolygon(ref rings) if rings.len() == 2));
    }

    #[rstest]
    fn rings_touching_at_one_node_stay_separate(mut graph: ElementGraph) {
        for (id, lon, lat) in [(5, 2.0, 1.0), (6, 2.0, 2.0), (7, 1.0, 2.0)] {
            graph.nodes.insert(id, Coordinate::new(lon, lat));
        }
        graph.ways.insert(50, way(&[1, 2, 3]));
        graph.ways.insert(51, way(&[3, 5, 6, 7, 3]));
        graph.ways.insert(52, way(&[3, 4, 1]));
        let graph = with_relation(
            graph,
            vec![
                member(MemberKind::Way, 50, "outer"),
                member(MemberKind::Way, 51, "outer"),
                member(MemberKind::Way, 52, "outer"),
            ],
        );

        let geometry = assemble_geometry(&graph, relation_id()).expect("resolves");
        let BoundaryGeometry::MultiPolygon(rings) = geometry else {
            panic!("expected multipolygon");
        };
        let ring_points = |ids: &[i64]| -> Vec<Coordinate> {
            ids.iter().map(|id| graph.nodes[id]).collect()
        };
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].points(), ring_points(&[1, 2, 3, 4, 1]).as_slice());
        assert_eq!(rings[1].points(), ring_points(&[3, 5, 6, 7, 3]).as_slice());
    }

    #[rstest]
    fn inner_members_are_ignored(mut graph: ElementGraph) {
        graph.ways.insert(50, way(&[1, 2, 3, 4, 1]));
        graph.ways.insert(70, way(&[11, 12, 13, 11]));
        let graph = with_relation(
            graph,
            vec![
                member(MemberKind::Way, 50, "outer"),
                member(MemberKind::Way, 70, "inner"),
            ],
        );

        let geometry = assemble_geometry(&graph, relation_id()).expect("resolves");
        assert!(matches!(geometry, BoundaryGeometry::Polygon(_)));
    }

    #[rstest]
    fn relation_that_cannot_close_is_malformed(mut graph: ElementGraph) {
        graph.ways.insert(50, way(&[1, 2, 3]));
        graph.ways.insert(51, way(&[3, 4]));
        let graph = with_relation(
            graph,
            vec![
                member(MemberKind::Way, 50, "outer"),
                member(MemberKind::Way, 51, "outer"),
            ],
        );

        let result = assemble_geometry(&graph, relation_id());
        assert!(matches!(
            result,
            Err(BoundaryResolutionError::MalformedGeometry { .. })
        ));
    }

    #[rstest]
    fn relation_without_outer_members_fails(mut graph: ElementGraph) {
        graph.ways.insert(70, way(&[1, 2, 3, 1]));
        let graph = with_relation(graph, vec![member(MemberKind::Way, 70, "inner")]);

        let result = assemble_geometry(&graph, relation_id());
        assert!(matches!(
            result,
            Err(BoundaryResolutionError::GeometryResolutionFailed { .. })
        ));
    }

    #[rstest]
    fn missing_nodes_fail_resolution(mut graph: ElementGraph) {
        graph.ways.insert(50, way(&[1, 2, 99]));
        let result = assemble_geometry(&graph, CompositeId::new(ElementKind::Way, 50));
        assert!(matches!(
            result,
            Err(BoundaryResolutionError::GeometryResolutionFailed { .. })
        ));
    }

    #[rstest]
    fn missing_element_fails_resolution(graph: ElementGraph) {
        let result = assemble_geometry(&graph, relation_id());
        assert!(matches!(
            result,
            Err(BoundaryResolutionError::GeometryResolutionFailed { .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn resolver_maps_source_failures_to_upstream_unavailable() {
        let mut source = MockBoundarySource::new();
        source
            .expect_fetch_element_graph()
            .times(1)
            .return_once(|_| Err(BoundarySourceError::timeout("25s elapsed")));
        let resolver = GeometryResolver::new(Arc::new(source));

        let result = resolver.resolve_geometry(relation_id()).await;
        assert!(matches!(
            result,
            Err(BoundaryResolutionError::UpstreamUnavailable { .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn resolve_boundary_takes_tags_from_the_fetched_element(mut graph: ElementGraph) {
        graph.ways.insert(50, way(&[1, 2, 3, 4, 1]));
        let mut relation_graph = with_relation(graph, vec![member(MemberKind::Way, 50, "outer")]);
        if let Some(relation) = relation_graph.relations.get_mut(&RELATION_ID) {
            relation.tags.insert("name".to_owned(), "Springfield".to_owned());
            relation.tags.insert("admin_level".to_owned(), "8".to_owned());
        }
        let mut source = MockBoundarySource::new();
        source
            .expect_fetch_element_graph()
            .return_once(move |_| Ok(relation_graph));
        let resolver = GeometryResolver::new(Arc::new(source));

        let boundary = resolver
            .resolve_boundary(relation_id())
            .await
            .expect("resolves");
        assert_eq!(boundary.display_name(), "Springfield");
        assert_eq!(boundary.admin_level(), Some("8"));
        assert!(boundary.score().abs() < f64::EPSILON);
    }

    #[rstest]
    #[tokio::test]
    async fn resolver_assembles_the_fetched_graph(mut graph: ElementGraph) {
        graph.ways.insert(50, way(&[1, 2, 3]));
        let mut source = MockBoundarySource::new();
        source
            .expect_fetch_element_graph()
            .withf(|id| id.external_id() == 50)
            .return_once(move |_| Ok(graph));
        let resolver = GeometryResolver::new(Arc::new(source));

        let geometry = resolver
            .resolve_geometry(CompositeId::new(ElementKind::Way, 50))
            .await
            .expect("resolves");
        assert_eq!(geometry.rings().len(), 1);
    }
}
