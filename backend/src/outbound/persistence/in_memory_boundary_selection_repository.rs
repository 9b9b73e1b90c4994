//! Process-local selection store.
//!
//! Used when no database is configured and by behaviour tests. Replaced
//! selections stay in the history list with their active flag cleared,
//! mirroring the PostgreSQL table. Only the most recent
//! [`MAX_INACTIVE_PER_CITY`] inactive rows are kept for each city.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{BoundarySelectionRepository, BoundarySelectionRepositoryError};
use crate::domain::{BoundarySelection, CityId};

/// Inactive rows retained per city; older ones are discarded first.
pub const MAX_INACTIVE_PER_CITY: usize = 16;

#[derive(Debug, Clone)]
struct StoredSelection {
    selection: BoundarySelection,
    is_active: bool,
}

/// Mutex-guarded selection history.
#[derive(Debug, Default)]
pub struct InMemoryBoundarySelectionRepository {
    rows: Mutex<Vec<StoredSelection>>,
}

impl InMemoryBoundarySelectionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<StoredSelection>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Retained selections for the city, oldest first.
    pub fn history(&self, city_id: &CityId) -> Vec<BoundarySelection> {
        self.rows()
            .iter()
            .filter(|row| row.selection.city_id() == city_id)
            .map(|row| row.selection.clone())
            .collect()
    }

    /// Number of active rows for the city.
    pub fn active_count(&self, city_id: &CityId) -> usize {
        self.rows()
            .iter()
            .filter(|row| row.is_active && row.selection.city_id() == city_id)
            .count()
    }
}

fn deactivate_rows(rows: &mut [StoredSelection], city_id: &CityId) -> bool {
    let mut cleared = false;
    for row in rows
        .iter_mut()
        .filter(|row| row.is_active && row.selection.city_id() == city_id)
    {
        row.is_active = false;
        cleared = true;
    }
    cleared
}

fn prune_history(rows: &mut Vec<StoredSelection>, city_id: &CityId) {
    let inactive = rows
        .iter()
        .filter(|row| !row.is_active && row.selection.city_id() == city_id)
        .count();
    let mut excess = inactive.saturating_sub(MAX_INACTIVE_PER_CITY);
    rows.retain(|row| {
        let drop = excess > 0 && !row.is_active && row.selection.city_id() == city_id;
        if drop {
            excess -= 1;
        }
        !drop
    });
}

#[async_trait]
impl BoundarySelectionRepository for InMemoryBoundarySelectionRepository {
    async fn replace_active(
        &self,
        selection: &BoundarySelection,
    ) -> Result<(), BoundarySelectionRepositoryError> {
        let mut rows = self.rows();
        deactivate_rows(&mut rows, selection.city_id());
        rows.push(StoredSelection {
            selection: selection.clone(),
            is_active: true,
        });
        prune_history(&mut rows, selection.city_id());
        Ok(())
    }

    async fn find_active(
        &self,
        city_id: &CityId,
    ) -> Result<Option<BoundarySelection>, BoundarySelectionRepositoryError> {
        Ok(self
            .rows()
            .iter()
            .find(|row| row.is_active && row.selection.city_id() == city_id)
            .map(|row| row.selection.clone()))
    }

    async fn deactivate(&self, city_id: &CityId) -> Result<bool, BoundarySelectionRepositoryError> {
        let mut rows = self.rows();
        let cleared = deactivate_rows(&mut rows, city_id);
        prune_history(&mut rows, city_id);
        Ok(cleared)
    }
}
