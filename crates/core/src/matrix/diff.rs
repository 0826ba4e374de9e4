//! Minimal write set between the working copy and the baseline.
//!
//! Supported cells are always upserted (the store's upsert is keyed on the
//! composite key, so re-sending an unchanged row is harmless). Deletes are
//! emitted only for cells that went from supported in the baseline to
//! unsupported now. Each upsert is labelled with its [`DiffStatus`] against
//! the baseline so callers can tell a real edit from a re-send.

use serde::Serialize;

use super::backend::MatrixRow;
use super::cell::CellKey;
use super::store::CellTable;
use crate::diff::DiffStatus;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpsertRecord {
    pub service_id: DbId,
    pub station_id: DbId,
    pub duration_minutes: i32,
    pub price_adjustment: i32,
    /// `Added`, `Changed` or `Unchanged` relative to the baseline.
    pub status: DiffStatus,
}

impl UpsertRecord {
    pub fn to_row(&self) -> MatrixRow {
        MatrixRow {
            service_id: self.service_id,
            station_id: self.station_id,
            duration_minutes: self.duration_minutes,
            price_adjustment: self.price_adjustment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteKey {
    pub service_id: DbId,
    pub station_id: DbId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatrixDiff {
    pub upserts: Vec<UpsertRecord>,
    pub deletes: Vec<DeleteKey>,
}

impl MatrixDiff {
    /// Nothing to send at all.
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }

    /// Number of records that change persisted state.
    pub fn pending_changes(&self) -> usize {
        self.deletes.len() + self.upserts.iter().filter(|u| u.status.is_change()).count()
    }

    /// Sending this diff would leave the store exactly as it is.
    pub fn is_noop(&self) -> bool {
        self.pending_changes() == 0
    }
}

/// Compute upserts and deletes for every cell of the given services.
///
/// Cells of services not in `service_ids` are skipped. Output follows
/// service order, then station-id order.
pub fn compute_diff(working: &CellTable, baseline: &CellTable, service_ids: &[DbId]) -> MatrixDiff {
    let mut diff = MatrixDiff::default();

    for &service_id in service_ids {
        for (key, cell) in working.range(CellKey::row_bounds(service_id)) {
            let before = baseline.get(key).and_then(|c| c.resolved());

            match cell.resolved() {
                Some(after) => {
                    let status = DiffStatus::classify(before.as_ref(), Some(&after))
                        .unwrap_or(DiffStatus::Added);
                    diff.upserts.push(UpsertRecord {
                        service_id: key.service_id,
                        station_id: key.station_id,
                        duration_minutes: after.0,
                        price_adjustment: after.1,
                        status,
                    });
                }
                None if before.is_some() => diff.deletes.push(DeleteKey {
                    service_id: key.service_id,
                    station_id: key.station_id,
                }),
                None => {}
            }
        }
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::cell::MatrixCell;
    use crate::matrix::store::tests::sample_store;
    use crate::matrix::store::MatrixStore;

    #[test]
    fn fresh_baseline_resends_supported_cells_as_unchanged() {
        let store = sample_store();
        let diff = store.diff();
        assert!(diff.deletes.is_empty());
        assert_eq!(diff.upserts.len(), 1);
        assert_eq!(diff.upserts[0].status, DiffStatus::Unchanged);
        assert!(diff.is_noop());
        assert!(!diff.is_empty());
    }

    #[test]
    fn toggle_on_emits_added_upsert_with_defaults() {
        let mut store = sample_store();
        store.toggle_supported(CellKey::new(2, 11));
        let diff = store.diff();
        let added: Vec<_> = diff
            .upserts
            .iter()
            .filter(|u| u.status == DiffStatus::Added)
            .collect();
        assert_eq!(added.len(), 1);
        assert_eq!(
            (added[0].service_id, added[0].station_id, added[0].duration_minutes, added[0].price_adjustment),
            (2, 11, 60, 0)
        );
        assert!(diff.deletes.is_empty());
    }

    #[test]
    fn toggle_off_emits_delete_only() {
        let mut store = sample_store();
        store.toggle_supported(CellKey::new(1, 10));
        let diff = store.diff();
        assert!(diff.upserts.is_empty());
        assert_eq!(diff.deletes, vec![DeleteKey { service_id: 1, station_id: 10 }]);
        assert_eq!(diff.pending_changes(), 1);
    }

    #[test]
    fn off_then_on_again_is_a_changed_upsert_not_a_delete() {
        let mut store = sample_store();
        let key = CellKey::new(1, 10);
        store.toggle_supported(key);
        store.toggle_supported(key);
        let diff = store.diff();
        assert!(diff.deletes.is_empty());
        assert_eq!(diff.upserts[0].status, DiffStatus::Changed);
        assert_eq!(diff.upserts[0].duration_minutes, 60);
    }

    #[test]
    fn twice_edited_cell_converges_to_one_upsert() {
        let mut store = sample_store();
        let key = CellKey::new(1, 10);
        store.set_duration(key, "30");
        store.set_duration(key, "45");
        store.set_price_adjustment(key, "-5");
        let diff = store.diff();
        assert_eq!(diff.upserts.len(), 1);
        assert_eq!(diff.upserts[0].duration_minutes, 45);
        assert_eq!(diff.upserts[0].price_adjustment, -5);
        assert_eq!(diff.upserts[0].status, DiffStatus::Changed);
    }

    #[test]
    fn unsupported_in_both_emits_nothing_even_with_stale_values() {
        let mut store = sample_store();
        store.set_duration(CellKey::new(2, 12), "99");
        let diff = store.diff();
        assert!(diff.upserts.iter().all(|u| u.service_id == 1));
        assert!(diff.deletes.is_empty());
    }

    #[test]
    fn supported_cell_missing_values_gets_defaults() {
        let mut store = sample_store();
        let key = CellKey::new(2, 10);
        store.set_cell(
            key,
            MatrixCell {
                supported: true,
                duration_minutes: None,
                price_adjustment: None,
            },
        );
        let diff = store.diff();
        let rec = diff.upserts.iter().find(|u| u.service_id == 2).unwrap();
        assert_eq!((rec.duration_minutes, rec.price_adjustment), (60, 0));
    }

    #[test]
    fn services_outside_the_list_are_skipped() {
        let store = sample_store();
        let diff = compute_diff(store.working(), store.baseline(), &[2]);
        assert!(diff.is_empty());
    }

    /// Deletes are exactly baseline-on/now-off; upserts exactly now-on.
    #[test]
    fn mixed_edit_sequence_matches_presence_transitions() {
        let rows = [
            crate::matrix::store::tests::row(1, 10, 90, 10),
            crate::matrix::store::tests::row(1, 11, 30, 0),
            crate::matrix::store::tests::row(2, 12, 45, 5),
        ];
        let mut store = MatrixStore::build(vec![1, 2], vec![10, 11, 12], &rows).store;
        store.snapshot_baseline();

        store.toggle_supported(CellKey::new(1, 11));
        store.toggle_supported(CellKey::new(2, 10));
        store.set_duration(CellKey::new(2, 10), "20");
        store.toggle_supported(CellKey::new(2, 12));
        store.toggle_supported(CellKey::new(2, 12));
        store.toggle_supported(CellKey::new(2, 11));
        store.toggle_supported(CellKey::new(2, 11));

        let diff = store.diff();
        let upserted: Vec<(DbId, DbId, i32)> = diff
            .upserts
            .iter()
            .map(|u| (u.service_id, u.station_id, u.duration_minutes))
            .collect();
        assert_eq!(upserted, vec![(1, 10, 90), (2, 10, 20), (2, 12, 60)]);
        assert_eq!(diff.deletes, vec![DeleteKey { service_id: 1, station_id: 11 }]);
    }
}
