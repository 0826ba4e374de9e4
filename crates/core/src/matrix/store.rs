//! In-memory working copy of the matrix plus its last-synced baseline.
//!
//! The table is a single `BTreeMap` keyed by [`CellKey`]. It is populated
//! for every (service, active station) pair at build time, so a key missing
//! from the table means the service or station is unknown to this load and
//! any mutation addressing it is dropped.

use std::collections::BTreeMap;

use super::backend::MatrixRow;
use super::cell::{parse_duration_input, parse_price_input, CellKey, MatrixCell};
use super::diff::{compute_diff, MatrixDiff};
use crate::types::DbId;

pub type CellTable = BTreeMap<CellKey, MatrixCell>;

#[derive(Debug, Clone, Default)]
pub struct MatrixStore {
    service_ids: Vec<DbId>,
    station_ids: Vec<DbId>,
    working: CellTable,
    baseline: CellTable,
}

/// Result of [`MatrixStore::build`].
#[derive(Debug)]
pub struct BuiltStore {
    pub store: MatrixStore,
    /// Rows that referenced a service or station outside the given id sets.
    pub dropped_rows: usize,
}

impl MatrixStore {
    /// Build a working copy from persisted rows.
    ///
    /// Every (service, station) pair starts unsupported; each row marks its
    /// pair supported with the stored values. The baseline is left empty
    /// until [`snapshot_baseline`](Self::snapshot_baseline) is called.
    pub fn build(service_ids: Vec<DbId>, station_ids: Vec<DbId>, rows: &[MatrixRow]) -> BuiltStore {
        let mut working = CellTable::new();
        for &service_id in &service_ids {
            for &station_id in &station_ids {
                working.insert(CellKey::new(service_id, station_id), MatrixCell::unsupported());
            }
        }

        let mut dropped_rows = 0;
        for row in rows {
            match working.get_mut(&CellKey::new(row.service_id, row.station_id)) {
                Some(cell) => *cell = MatrixCell::supported(row.duration_minutes, row.price_adjustment),
                None => dropped_rows += 1,
            }
        }

        BuiltStore {
            store: Self {
                service_ids,
                station_ids,
                working,
                baseline: CellTable::new(),
            },
            dropped_rows,
        }
    }

    pub fn service_ids(&self) -> &[DbId] {
        &self.service_ids
    }

    /// Active station ids in display order.
    pub fn station_ids(&self) -> &[DbId] {
        &self.station_ids
    }

    pub fn working(&self) -> &CellTable {
        &self.working
    }

    pub fn baseline(&self) -> &CellTable {
        &self.baseline
    }

    pub fn contains(&self, key: CellKey) -> bool {
        self.working.contains_key(&key)
    }

    /// Current cell for a key; absent keys read as unsupported.
    pub fn cell(&self, key: CellKey) -> MatrixCell {
        self.working.get(&key).copied().unwrap_or_default()
    }

    /// Cells of one service, in station-id order.
    pub fn row(&self, service_id: DbId) -> impl Iterator<Item = (&CellKey, &MatrixCell)> {
        self.working.range(CellKey::row_bounds(service_id))
    }

    /// Full replace of one cell. Returns `false` for unknown keys.
    pub fn set_cell(&mut self, key: CellKey, cell: MatrixCell) -> bool {
        match self.working.get_mut(&key) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Flip `supported`. Switching on fills defaults; switching off clears values.
    pub fn toggle_supported(&mut self, key: CellKey) -> bool {
        let mut cell = self.cell(key);
        if cell.supported {
            cell.disable();
        } else {
            cell.enable();
        }
        self.set_cell(key, cell)
    }

    /// Set the duration from raw input, leaving `supported` alone.
    ///
    /// Input that is not a non-negative integer is ignored.
    pub fn set_duration(&mut self, key: CellKey, raw: &str) -> bool {
        match parse_duration_input(raw) {
            Some(minutes) => self.write_duration(key, minutes),
            None => false,
        }
    }

    /// Set the price adjustment from raw input. Negative values are allowed.
    pub fn set_price_adjustment(&mut self, key: CellKey, raw: &str) -> bool {
        match parse_price_input(raw) {
            Some(amount) => self.write_price(key, amount),
            None => false,
        }
    }

    pub(crate) fn write_duration(&mut self, key: CellKey, minutes: i32) -> bool {
        if minutes < 0 {
            return false;
        }
        match self.working.get_mut(&key) {
            Some(cell) => {
                cell.duration_minutes = Some(minutes);
                true
            }
            None => false,
        }
    }

    pub(crate) fn write_price(&mut self, key: CellKey, amount: i32) -> bool {
        match self.working.get_mut(&key) {
            Some(cell) => {
                cell.price_adjustment = Some(amount);
                true
            }
            None => false,
        }
    }

    /// Freeze the current working copy as the baseline.
    ///
    /// Cells are `Copy`, so the clone is a full structural copy.
    pub fn snapshot_baseline(&mut self) {
        self.baseline = self.working.clone();
    }

    /// Diff of the working copy against the baseline over this store's services.
    pub fn diff(&self) -> MatrixDiff {
        compute_diff(&self.working, &self.baseline, &self.service_ids)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::matrix::cell::{DEFAULT_DURATION_MINUTES, DEFAULT_PRICE_ADJUSTMENT};

    pub(crate) fn row(service_id: DbId, station_id: DbId, d: i32, p: i32) -> MatrixRow {
        MatrixRow {
            service_id,
            station_id,
            duration_minutes: d,
            price_adjustment: p,
        }
    }

    /// Services 1..=2, stations 10..=12, one synced row at (1, 10).
    pub(crate) fn sample_store() -> MatrixStore {
        let mut store = MatrixStore::build(vec![1, 2], vec![10, 11, 12], &[row(1, 10, 90, 10)]).store;
        store.snapshot_baseline();
        store
    }

    #[test]
    fn build_populates_every_pair_and_drops_stale_rows() {
        let built = MatrixStore::build(
            vec![1, 2],
            vec![10, 11],
            &[row(1, 10, 30, 0), row(3, 10, 30, 0), row(1, 99, 30, 0)],
        );
        assert_eq!(built.dropped_rows, 2);
        assert_eq!(built.store.working().len(), 4);
        assert_eq!(built.store.cell(CellKey::new(1, 10)), MatrixCell::supported(30, 0));
        assert!(!built.store.cell(CellKey::new(2, 11)).supported);
        assert!(built.store.baseline().is_empty());
    }

    #[test]
    fn toggle_on_fills_defaults() {
        let mut store = sample_store();
        let key = CellKey::new(2, 11);
        assert!(store.toggle_supported(key));
        assert_eq!(
            store.cell(key),
            MatrixCell::supported(DEFAULT_DURATION_MINUTES, DEFAULT_PRICE_ADJUSTMENT)
        );
    }

    #[test]
    fn toggle_off_clears_values() {
        let mut store = sample_store();
        let key = CellKey::new(1, 10);
        assert!(store.toggle_supported(key));
        assert_eq!(store.cell(key), MatrixCell::unsupported());
    }

    #[test]
    fn toggle_on_keeps_duration_typed_while_unsupported() {
        let mut store = sample_store();
        let key = CellKey::new(2, 12);
        assert!(store.set_duration(key, "25"));
        assert!(!store.cell(key).supported);
        store.toggle_supported(key);
        assert_eq!(store.cell(key), MatrixCell::supported(25, 0));
    }

    #[test]
    fn invalid_duration_leaves_previous_value() {
        let mut store = sample_store();
        let key = CellKey::new(1, 10);
        for bad in ["-5", "abc", "NaN", "", "7.25"] {
            assert!(!store.set_duration(key, bad), "{bad:?} should be rejected");
            assert_eq!(store.cell(key).duration_minutes, Some(90));
        }
        assert!(store.set_duration(key, "120"));
        assert_eq!(store.cell(key).duration_minutes, Some(120));
        assert!(store.cell(key).supported);
    }

    #[test]
    fn price_adjustment_accepts_negative_and_rejects_text() {
        let mut store = sample_store();
        let key = CellKey::new(1, 10);
        assert!(store.set_price_adjustment(key, "-15"));
        assert_eq!(store.cell(key).price_adjustment, Some(-15));
        assert!(!store.set_price_adjustment(key, "free"));
        assert_eq!(store.cell(key).price_adjustment, Some(-15));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut store = sample_store();
        let ghost = CellKey::new(7, 10);
        assert!(!store.toggle_supported(ghost));
        assert!(!store.set_duration(ghost, "30"));
        assert!(!store.set_cell(ghost, MatrixCell::supported(1, 1)));
        assert!(!store.contains(ghost));
    }

    #[test]
    fn baseline_is_not_affected_by_edits() {
        let mut store = sample_store();
        let key = CellKey::new(1, 10);
        store.set_duration(key, "15");
        store.toggle_supported(CellKey::new(2, 10));
        assert_eq!(store.baseline()[&key], MatrixCell::supported(90, 10));
        assert!(!store.baseline()[&CellKey::new(2, 10)].supported);
    }

    #[test]
    fn row_scans_one_service() {
        let store = sample_store();
        let stations: Vec<DbId> = store.row(1).map(|(k, _)| k.station_id).collect();
        assert_eq!(stations, vec![10, 11, 12]);
        assert_eq!(store.row(5).count(), 0);
    }
}
