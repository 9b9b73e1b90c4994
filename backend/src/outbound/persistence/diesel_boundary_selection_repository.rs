//! PostgreSQL-backed `BoundarySelectionRepository`.
//!
//! `replace_active` deactivates the current row and inserts the new one inside
//! a single transaction. The transaction first takes a PostgreSQL advisory lock
//! keyed on the city id, so writers in other processes queue behind it instead
//! of tripping the partial unique index on active rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::OptionalExtension;
use diesel::prelude::*;
use diesel::pg::Pg;
use diesel::query_builder::{QueryFragment, QueryId};
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::boundary_selections;
use crate::domain::ports::{BoundarySelectionRepository, BoundarySelectionRepositoryError};
use crate::domain::{BoundarySelection, CityId, ResolvedBoundary, UserId};

/// Diesel-backed selection store.
#[derive(Clone)]
pub struct DieselBoundarySelectionRepository {
    pool: DbPool,
}

impl DieselBoundarySelectionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Blocks until no other transaction holds the write lock for the city.
/// PostgreSQL releases it at commit or rollback.
const CITY_WRITE_LOCK_SQL: &str = "SELECT pg_advisory_xact_lock(hashtext($1))";

fn city_write_lock(city_id: &str) -> impl QueryFragment<Pg> + QueryId + Send + '_ {
    diesel::sql_query(CITY_WRITE_LOCK_SQL).bind::<Text, _>(city_id)
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = boundary_selections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct BoundarySelectionRow {
    city_id: String,
    composite_id: String,
    boundary: serde_json::Value,
    selected_by: String,
    selected_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = boundary_selections)]
struct NewBoundarySelectionRow<'a> {
    id: Uuid,
    city_id: &'a str,
    composite_id: String,
    element_kind: &'static str,
    boundary: serde_json::Value,
    selected_by: &'a str,
    selected_at: DateTime<Utc>,
    is_active: bool,
}

fn to_insert_row(
    selection: &BoundarySelection,
) -> Result<NewBoundarySelectionRow<'_>, BoundarySelectionRepositoryError> {
    let boundary = serde_json::to_value(selection.boundary()).map_err(|error| {
        BoundarySelectionRepositoryError::query(format!(
            "failed to serialise boundary {}: {error}",
            selection.composite_id()
        ))
    })?;
    Ok(NewBoundarySelectionRow {
        id: Uuid::new_v4(),
        city_id: selection.city_id().as_str(),
        composite_id: selection.composite_id().to_string(),
        element_kind: selection.composite_id().kind().as_str(),
        boundary,
        selected_by: selection.selected_by().as_ref(),
        selected_at: selection.selected_at(),
        is_active: true,
    })
}

impl TryFrom<BoundarySelectionRow> for BoundarySelection {
    type Error = BoundarySelectionRepositoryError;

    fn try_from(row: BoundarySelectionRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str, detail: String| {
            BoundarySelectionRepositoryError::query(format!(
                "stored selection {} has invalid {field}: {detail}",
                row.composite_id
            ))
        };
        let city_id =
            CityId::new(row.city_id.clone()).map_err(|err| corrupt("city_id", err.to_string()))?;
        let selected_by = UserId::new(row.selected_by.clone())
            .map_err(|err| corrupt("selected_by", err.to_string()))?;
        let boundary: ResolvedBoundary = serde_json::from_value(row.boundary.clone())
            .map_err(|err| corrupt("boundary", err.to_string()))?;
        Ok(BoundarySelection::new(
            city_id,
            boundary,
            row.selected_at,
            selected_by,
        ))
    }
}

#[async_trait]
impl BoundarySelectionRepository for DieselBoundarySelectionRepository {
    async fn replace_active(
        &self,
        selection: &BoundarySelection,
    ) -> Result<(), BoundarySelectionRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let row = to_insert_row(selection)?;
        let deactivated_at = selection.selected_at();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                city_write_lock(row.city_id).execute(conn).await?;

                diesel::update(
                    boundary_selections::table
                        .filter(boundary_selections::city_id.eq(row.city_id))
                        .filter(boundary_selections::is_active.eq(true)),
                )
                .set((
                    boundary_selections::is_active.eq(false),
                    boundary_selections::deactivated_at.eq(Some(deactivated_at)),
                ))
                .execute(conn)
                .await?;

                diesel::insert_into(boundary_selections::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_active(
        &self,
        city_id: &CityId,
    ) -> Result<Option<BoundarySelection>, BoundarySelectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = boundary_selections::table
            .filter(boundary_selections::city_id.eq(city_id.as_str()))
            .filter(boundary_selections::is_active.eq(true))
            .select(BoundarySelectionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(TryInto::try_into).transpose()
    }

    async fn deactivate(&self, city_id: &CityId) -> Result<bool, BoundarySelectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            boundary_selections::table
                .filter(boundary_selections::city_id.eq(city_id.as_str()))
                .filter(boundary_selections::is_active.eq(true)),
        )
        .set((
            boundary_selections::is_active.eq(false),
            boundary_selections::deactivated_at.eq(Some(Utc::now())),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
