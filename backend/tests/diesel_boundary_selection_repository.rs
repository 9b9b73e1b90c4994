//! Integration tests for `DieselBoundarySelectionRepository` against embedded
//! PostgreSQL.
//!
//! Each context applies the crate's migrations to a fresh database, so the
//! partial unique index on active rows is in force for every test.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use city_boundaries::domain::ports::BoundarySelectionRepository;
use city_boundaries::domain::{
    BoundaryGeometry, BoundarySelection, CityId, CompositeId, Coordinate, ElementKind, RawFeature,
    ResolvedBoundary, Ring, ScoredCandidate, UserId,
};
use city_boundaries::outbound::persistence::{DbPool, DieselBoundarySelectionRepository, PoolConfig};
use futures_util::future::join_all;
use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::test_cluster;
use support::{handle_cluster_setup_failure, migrate_schema, reset_database, selection_row_counts};

const TEST_DB: &str = "diesel_boundary_selection_repo_test";
const CITY: &str = "us-springfield-il";

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    database_url: String,
    repository: DieselBoundarySelectionRepository,
}

impl TestContext {
    /// A second repository with its own pool, standing in for another replica.
    fn replica(&self) -> DieselBoundarySelectionRepository {
        let pool = self
            .runtime
            .block_on(DbPool::new(pool_config(&self.database_url)))
            .expect("replica pool");
        DieselBoundarySelectionRepository::new(pool)
    }

    fn row_counts(&self) -> (i64, i64) {
        selection_row_counts(&self.database_url, CITY).expect("count rows")
    }
}

fn pool_config(url: &str) -> PoolConfig {
    PoolConfig::new(url)
        .with_max_size(4)
        .with_min_idle(Some(1))
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    reset_database(&cluster, TEST_DB)?;
    let database_url = cluster.connection().database_url(TEST_DB);
    migrate_schema(&database_url)?;

    let pool = runtime
        .block_on(DbPool::new(pool_config(&database_url)))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        database_url,
        repository: DieselBoundarySelectionRepository::new(pool),
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn city() -> CityId {
    CityId::new(CITY).expect("valid city id")
}

fn selected_at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("valid timestamp")
        + Duration::minutes(minutes)
}

fn selection(relation_id: i64, name: &str, minutes: i64) -> BoundarySelection {
    let feature = RawFeature {
        id: CompositeId::new(ElementKind::Relation, relation_id),
        tags: BTreeMap::from([
            ("name".to_owned(), name.to_owned()),
            ("admin_level".to_owned(), "8".to_owned()),
        ]),
        bounding_box: None,
    };
    let ring = Ring::close(vec![
        Coordinate::new(-89.7, 39.7),
        Coordinate::new(-89.6, 39.7),
        Coordinate::new(-89.6, 39.8),
        Coordinate::new(-89.7, 39.8),
    ])
    .expect("valid ring");
    BoundarySelection::new(
        city(),
        ResolvedBoundary::new(
            ScoredCandidate::new(feature, 120.0, 21.0),
            BoundaryGeometry::Polygon(ring),
        ),
        selected_at(minutes),
        UserId::new("user-1").expect("valid user id"),
    )
}

#[rstest]
fn selecting_the_same_boundary_twice_keeps_one_active_row(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: selecting_the_same_boundary_twice_keeps_one_active_row skipped");
        return;
    };
    let repository = context.repository.clone();
    let first = selection(161_950, "Springfield", 0);
    let again = selection(161_950, "Springfield", 5);

    context
        .runtime
        .block_on(async {
            repository.replace_active(&first).await?;
            repository.replace_active(&again).await
        })
        .expect("both writes succeed");

    let active = context
        .runtime
        .block_on(repository.find_active(&city()))
        .expect("read succeeds")
        .expect("active selection");
    assert_eq!(active.composite_id(), first.composite_id());
    assert_eq!(active.selected_at(), again.selected_at());
    assert_eq!(active.boundary().display_name(), "Springfield");
    assert_eq!(context.row_counts(), (1, 2));
}

#[rstest]
fn a_new_selection_replaces_the_previous_one(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: a_new_selection_replaces_the_previous_one skipped");
        return;
    };
    let repository = context.repository.clone();
    let county = selection(122_604, "Sangamon County", 0);
    let city_limits = selection(161_950, "Springfield", 10);

    context
        .runtime
        .block_on(async {
            repository.replace_active(&county).await?;
            repository.replace_active(&city_limits).await
        })
        .expect("both writes succeed");

    let active = context
        .runtime
        .block_on(repository.find_active(&city()))
        .expect("read succeeds")
        .expect("active selection");
    assert_eq!(active.composite_id(), city_limits.composite_id());
    assert_eq!(active.boundary().display_name(), "Springfield");
    assert_eq!(
        active.boundary().geometry().rings()[0].points().len(),
        city_limits.boundary().geometry().rings()[0].points().len()
    );
    assert_eq!(context.row_counts(), (1, 2));
}

#[rstest]
fn restoring_the_default_clears_the_active_selection(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: restoring_the_default_clears_the_active_selection skipped");
        return;
    };
    let repository = context.repository.clone();

    let (first, second, remaining) = context
        .runtime
        .block_on(async {
            repository
                .replace_active(&selection(161_950, "Springfield", 0))
                .await?;
            let first = repository.deactivate(&city()).await?;
            let second = repository.deactivate(&city()).await?;
            let remaining = repository.find_active(&city()).await?;
            Ok::<_, city_boundaries::domain::ports::BoundarySelectionRepositoryError>((
                first, second, remaining,
            ))
        })
        .expect("repository calls succeed");

    assert!(first, "an active selection existed");
    assert!(!second, "nothing left to deactivate");
    assert!(remaining.is_none());
    assert_eq!(context.row_counts(), (0, 1));
}

#[rstest]
fn concurrent_writers_on_separate_pools_all_succeed(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_writers_on_separate_pools_all_succeed skipped");
        return;
    };
    let replicas = [context.repository.clone(), context.replica()];
    let selections: Vec<_> = (0..8)
        .map(|i| selection(161_950 + i, "Springfield", i))
        .collect();

    let results = context.runtime.block_on(join_all(
        selections
            .iter()
            .enumerate()
            .map(|(i, selection)| replicas[i % replicas.len()].replace_active(selection)),
    ));

    for result in results {
        result.expect("no writer is rejected by the active-row index");
    }
    assert_eq!(context.row_counts(), (1, 8));
}
