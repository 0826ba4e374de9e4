//! The user-chosen, user-ordered subset of stations shown as columns.
//!
//! The selection is client-side state: it is seeded with every active
//! station on first load, survives reloads by id, and is never written to
//! the persistence backend.

use serde::Serialize;

use super::backend::StationSummary;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnToggle {
    Added,
    Removed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnSelection {
    ids: Vec<DbId>,
}

impl ColumnSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = DbId>) -> Self {
        let mut selection = Self::new();
        for id in ids {
            if !selection.contains(id) {
                selection.ids.push(id);
            }
        }
        selection
    }

    pub fn ids(&self) -> &[DbId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, station_id: DbId) -> bool {
        self.ids.contains(&station_id)
    }

    pub fn position(&self, station_id: DbId) -> Option<usize> {
        self.ids.iter().position(|id| *id == station_id)
    }

    /// Append the station if absent, remove it if present.
    pub fn toggle(&mut self, station_id: DbId) -> ColumnToggle {
        match self.position(station_id) {
            Some(index) => {
                self.ids.remove(index);
                ColumnToggle::Removed
            }
            None => {
                self.ids.push(station_id);
                ColumnToggle::Added
            }
        }
    }

    /// Move `active_id` into `over_id`'s slot, shifting the items between.
    ///
    /// `[A, B, C, D]` with `reorder(A, C)` becomes `[B, C, A, D]`. Returns
    /// `false` (and changes nothing) if either id is not selected.
    pub fn reorder(&mut self, active_id: DbId, over_id: DbId) -> bool {
        let (Some(from), Some(to)) = (self.position(active_id), self.position(over_id)) else {
            return false;
        };
        if from != to {
            let moved = self.ids.remove(from);
            self.ids.insert(to, moved);
        }
        true
    }

    /// Select every given station not already selected, in the given order.
    pub fn mark_all(&mut self, station_ids: &[DbId]) -> usize {
        let missing: Vec<DbId> = station_ids
            .iter()
            .copied()
            .filter(|id| !self.contains(*id))
            .collect();
        missing.into_iter().map(|id| self.toggle(id)).count()
    }

    /// Deselect everything.
    pub fn clear_all(&mut self) -> usize {
        self.ids.clone().into_iter().map(|id| self.toggle(id)).count()
    }

    /// Replace the selection with the given stations.
    pub fn seed(&mut self, station_ids: &[DbId]) {
        *self = Self::from_ids(station_ids.iter().copied());
    }

    /// Drop ids that are no longer among `station_ids`, returning them.
    pub fn prune(&mut self, station_ids: &[DbId]) -> Vec<DbId> {
        let (kept, dropped): (Vec<DbId>, Vec<DbId>) =
            self.ids.iter().partition(|id| station_ids.contains(*id));
        self.ids = kept;
        dropped
    }
}

/// One station in the full catalogue, active or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogueEntry {
    pub station_id: DbId,
    pub name: String,
    pub is_active: bool,
    pub selected: bool,
    /// Index in the column order when selected.
    pub position: Option<usize>,
}

/// Every station, including inactive ones, annotated with selection state.
pub fn catalogue(stations: &[StationSummary], selection: &ColumnSelection) -> Vec<CatalogueEntry> {
    stations
        .iter()
        .map(|station| {
            let position = station
                .is_active
                .then(|| selection.position(station.id))
                .flatten();
            CatalogueEntry {
                station_id: station.id,
                name: station.name.clone(),
                is_active: station.is_active,
                selected: position.is_some(),
                position,
            }
        })
        .collect()
}
