//! Tests for boundary search orchestration.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use mockall::predicate::always;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    BoundarySourceError, ElementGraph, MemberKind, MockBoundarySource, RawRelation, RawWay,
    RelationMember,
};
use crate::domain::{CompositeId, Coordinate, ElementKind, ErrorCode, RawFeature, Tags};

const OUTLINE_WAY_ID: i64 = 10_000;

fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

fn relation(id: i64, pairs: &[(&str, &str)]) -> RawFeature {
    RawFeature {
        id: CompositeId::new(ElementKind::Relation, id),
        tags: tags(pairs),
        bounding_box: None,
    }
}

/// A unit square outline for `id`, shaped as the element kind requires.
fn square_graph(id: CompositeId) -> ElementGraph {
    let mut graph = ElementGraph::default();
    for (node, lon, lat) in [(1, 0.0, 0.0), (2, 0.1, 0.0), (3, 0.1, 0.1), (4, 0.0, 0.1)] {
        graph.nodes.insert(node, Coordinate::new(lon, lat));
    }
    let way_id = match id.kind() {
        ElementKind::Way => id.external_id(),
        ElementKind::Relation => OUTLINE_WAY_ID,
    };
    graph.ways.insert(
        way_id,
        RawWay {
            node_ids: vec![1, 2, 3, 4, 1],
            tags: Tags::new(),
        },
    );
    if id.kind() == ElementKind::Relation {
        graph.relations.insert(
            id.external_id(),
            RawRelation {
                members: vec![RelationMember {
                    kind: MemberKind::Way,
                    id: OUTLINE_WAY_ID,
                    role: "outer".to_owned(),
                }],
                tags: Tags::new(),
            },
        );
    }
    graph
}

#[fixture]
fn springfield() -> BoundarySearchRequest {
    BoundarySearchRequest::new("Springfield", "United States").expect("valid request")
}

fn ids(boundaries: &[ResolvedBoundary]) -> Vec<i64> {
    boundaries
        .iter()
        .map(|boundary| boundary.composite_id().external_id())
        .collect()
}

#[rstest]
#[tokio::test]
async fn city_outranks_state_level_namesake(springfield: BoundarySearchRequest) {
    let mut source = MockBoundarySource::new();
    source
        .expect_search_candidates()
        .withf(|search| search.city_name == "Springfield" && search.territory.as_str() == "US")
        .times(1)
        .return_once(|_| {
            Ok(vec![
                relation(
                    1,
                    &[
                        ("boundary", "administrative"),
                        ("admin_level", "4"),
                        ("name", "Springfield County"),
                    ],
                ),
                relation(
                    2,
                    &[
                        ("boundary", "administrative"),
                        ("admin_level", "8"),
                        ("place", "city"),
                        ("name", "Springfield"),
                    ],
                ),
            ])
        });
    source
        .expect_fetch_element_graph()
        .times(2)
        .returning(|id| Ok(square_graph(id)));
    let service = BoundarySearchService::new(Arc::new(source));

    let boundaries = service
        .search_boundaries(&springfield)
        .await
        .expect("search succeeds");

    assert_eq!(ids(&boundaries), vec![2, 1]);
    assert!(boundaries[0].score() > boundaries[1].score());
    assert_eq!(boundaries[0].display_name(), "Springfield");
}

#[rstest]
#[tokio::test]
async fn empty_candidate_set_is_a_successful_empty_result(springfield: BoundarySearchRequest) {
    let mut source = MockBoundarySource::new();
    source
        .expect_search_candidates()
        .return_once(|_| Ok(Vec::new()));
    source.expect_fetch_element_graph().times(0);
    let service = BoundarySearchService::new(Arc::new(source));

    let boundaries = service
        .search_boundaries(&springfield)
        .await
        .expect("empty search succeeds");
    assert!(boundaries.is_empty());
}

#[rstest]
#[tokio::test]
async fn failed_top_candidate_is_dropped_without_a_hole(springfield: BoundarySearchRequest) {
    let mut source = MockBoundarySource::new();
    source.expect_search_candidates().return_once(|_| {
        Ok(vec![
            relation(1, &[("name", "Springfield"), ("admin_level", "8")]),
            relation(2, &[("name", "Springfield Township")]),
        ])
    });
    source.expect_fetch_element_graph().returning(|id| {
        if id.external_id() == 1 {
            Ok(ElementGraph::default())
        } else {
            Ok(square_graph(id))
        }
    });
    let service = BoundarySearchService::new(Arc::new(source));

    let boundaries = service
        .search_boundaries(&springfield)
        .await
        .expect("search succeeds");
    assert_eq!(ids(&boundaries), vec![2]);
}

#[rstest]
#[tokio::test]
async fn geometry_transport_errors_only_drop_the_candidate(springfield: BoundarySearchRequest) {
    let mut source = MockBoundarySource::new();
    source
        .expect_search_candidates()
        .return_once(|_| Ok(vec![relation(1, &[]), relation(2, &[])]));
    source.expect_fetch_element_graph().returning(|id| {
        if id.external_id() == 2 {
            Err(BoundarySourceError::rate_limited("429"))
        } else {
            Ok(square_graph(id))
        }
    });
    let service = BoundarySearchService::new(Arc::new(source));

    let boundaries = service
        .search_boundaries(&springfield)
        .await
        .expect("search succeeds");
    assert_eq!(ids(&boundaries), vec![1]);
}

#[rstest]
#[tokio::test]
async fn stage_one_failure_is_upstream_unavailable(springfield: BoundarySearchRequest) {
    let mut source = MockBoundarySource::new();
    source
        .expect_search_candidates()
        .return_once(|_| Err(BoundarySourceError::transport("connection refused")));
    let service = BoundarySearchService::new(Arc::new(source));

    let error = service
        .search_boundaries(&springfield)
        .await
        .expect_err("search fails");
    assert!(matches!(
        error,
        BoundaryResolutionError::UpstreamUnavailable { .. }
    ));
}

#[rstest]
#[tokio::test]
async fn unknown_country_never_reaches_the_source() {
    let mut source = MockBoundarySource::new();
    source.expect_search_candidates().times(0);
    let service = BoundarySearchService::new(Arc::new(source));
    let request = BoundarySearchRequest::new("Atlantis City", "Atlantis").expect("valid request");

    let error = service
        .search_boundaries(&request)
        .await
        .expect_err("unknown country");
    assert_eq!(
        error,
        BoundaryResolutionError::UnknownCountry {
            name: "Atlantis".to_owned()
        }
    );
}

#[rstest]
#[tokio::test]
async fn explicit_country_code_bypasses_the_lookup() {
    let mut source = MockBoundarySource::new();
    source
        .expect_search_candidates()
        .withf(|search| search.territory.as_str() == "NZ")
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    let service = BoundarySearchService::new(Arc::new(source));
    let request = BoundarySearchRequest::new("Wellington", "Aotearoa")
        .expect("valid request")
        .with_country_code("NZ".parse().expect("valid code"));

    let boundaries = service
        .search_boundaries(&request)
        .await
        .expect("search succeeds");
    assert!(boundaries.is_empty());
}

#[rstest]
#[tokio::test]
async fn only_the_top_candidates_are_resolved(springfield: BoundarySearchRequest) {
    let request = springfield.with_result_limit(2).expect("limit in range");
    let mut source = MockBoundarySource::new();
    source
        .expect_search_candidates()
        .return_once(|_| Ok((1..=6).map(|id| relation(id, &[])).collect()));
    source
        .expect_fetch_element_graph()
        .with(always())
        .times(2)
        .returning(|id| Ok(square_graph(id)));
    let service = BoundarySearchService::new(Arc::new(source));

    let boundaries = service.search_boundaries(&request).await.expect("succeeds");
    assert_eq!(ids(&boundaries), vec![1, 2]);
}

#[rstest]
#[tokio::test]
async fn search_port_maps_errors_to_transport_codes(springfield: BoundarySearchRequest) {
    let mut source = MockBoundarySource::new();
    source
        .expect_search_candidates()
        .return_once(|_| Err(BoundarySourceError::timeout("stage one")));
    let service = BoundarySearchService::new(Arc::new(source));

    let error = service.search(springfield).await.expect_err("fails");
    assert_eq!(error.code(), ErrorCode::UpstreamUnavailable);
}

/// Source whose geometry fetches finish in reverse rank order.
struct SlowFirstSource {
    features: Vec<RawFeature>,
    delays: HashMap<i64, Duration>,
    completed: Mutex<Vec<i64>>,
}

#[async_trait]
impl BoundarySource for SlowFirstSource {
    async fn search_candidates(
        &self,
        _search: &CandidateSearch,
    ) -> Result<Vec<RawFeature>, BoundarySourceError> {
        Ok(self.features.clone())
    }

    async fn fetch_element_graph(
        &self,
        id: CompositeId,
    ) -> Result<ElementGraph, BoundarySourceError> {
        let delay = self
            .delays
            .get(&id.external_id())
            .copied()
            .unwrap_or_default();
        tokio::time::sleep(delay).await;
        self.completed
            .lock()
            .expect("completion log lock")
            .push(id.external_id());
        Ok(square_graph(id))
    }
}

#[rstest]
#[tokio::test]
async fn results_keep_rank_order_when_fetches_finish_out_of_order(
    springfield: BoundarySearchRequest,
) {
    let source = Arc::new(SlowFirstSource {
        features: vec![
            relation(1, &[("name", "Springfield"), ("admin_level", "8")]),
            relation(2, &[("name", "Springfield"), ("admin_level", "6")]),
            relation(3, &[("name", "Springfield")]),
        ],
        delays: HashMap::from([
            (1, Duration::from_millis(60)),
            (2, Duration::from_millis(30)),
        ]),
        completed: Mutex::new(Vec::new()),
    });
    let service = BoundarySearchService::new(Arc::clone(&source))
        .with_max_concurrent_geometry_fetches(3);

    let boundaries = service
        .search_boundaries(&springfield)
        .await
        .expect("search succeeds");

    assert_eq!(ids(&boundaries), vec![1, 2, 3]);
    let completed = source.completed.lock().expect("completion log lock").clone();
    assert_eq!(completed, vec![3, 2, 1]);
}
