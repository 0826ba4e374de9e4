//! Row-wide and multi-cell operations on the matrix store.

use serde::Deserialize;

use super::cell::{parse_integer_input, CellKey};
use super::store::MatrixStore;
use crate::types::DbId;

/// Floor applied to durations entered through the bulk-edit dialog.
pub const BULK_EDIT_MIN_DURATION_MINUTES: i32 = 5;

/// Lower bound for the "same time everywhere" control.
pub const UNIFORM_DURATION_MIN_MINUTES: i32 = 15;

/// Upper bound for the "same time everywhere" control.
pub const UNIFORM_DURATION_MAX_MINUTES: i32 = 180;

/// Clamp a uniform duration into the range the UI offers.
///
/// Callers apply this before [`MatrixStore::apply_duration_to_all_stations`];
/// the store itself only rejects negative values.
pub fn clamp_uniform_duration(minutes: i32) -> i32 {
    minutes.clamp(UNIFORM_DURATION_MIN_MINUTES, UNIFORM_DURATION_MAX_MINUTES)
}

/// Raw values from the bulk-edit dialog. `None` leaves that attribute alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkEdit {
    pub minutes: Option<String>,
    pub price_adjustment: Option<String>,
}

impl MatrixStore {
    /// Switch on every active station for a service, keeping existing values.
    ///
    /// Returns the number of cells that were switched on.
    pub fn turn_on_all(&mut self, service_id: DbId) -> usize {
        let mut changed = 0;
        for station_id in self.station_ids().to_vec() {
            let key = CellKey::new(service_id, station_id);
            let mut cell = self.cell(key);
            if cell.supported {
                continue;
            }
            cell.enable();
            if self.set_cell(key, cell) {
                changed += 1;
            }
        }
        changed
    }

    /// Switch off every active station for a service and clear its values.
    pub fn turn_off_all(&mut self, service_id: DbId) -> usize {
        let mut changed = 0;
        for station_id in self.station_ids().to_vec() {
            let key = CellKey::new(service_id, station_id);
            let mut cell = self.cell(key);
            if !cell.supported {
                continue;
            }
            cell.disable();
            if self.set_cell(key, cell) {
                changed += 1;
            }
        }
        changed
    }

    /// Overwrite the duration of every cell in the table.
    ///
    /// `supported` and price are untouched. Negative input is ignored and
    /// `0` is returned.
    pub fn apply_duration_to_all_stations(&mut self, minutes: i32) -> usize {
        if minutes < 0 {
            return 0;
        }
        let keys: Vec<CellKey> = self.working().keys().copied().collect();
        keys.into_iter()
            .filter(|key| self.write_duration(*key, minutes))
            .count()
    }

    /// Apply a bulk edit to the selected stations of one service.
    ///
    /// Durations are floored at [`BULK_EDIT_MIN_DURATION_MINUTES`]; input
    /// that does not parse keeps the cell's current value. Station ids that
    /// are not active in this store are skipped. Returns the number of
    /// cells touched.
    pub fn bulk_edit_selected_stations(
        &mut self,
        service_id: DbId,
        station_ids: &[DbId],
        edit: &BulkEdit,
    ) -> usize {
        let minutes = edit
            .minutes
            .as_deref()
            .and_then(parse_integer_input)
            .map(|m| m.max(BULK_EDIT_MIN_DURATION_MINUTES));
        let price = edit.price_adjustment.as_deref().and_then(parse_integer_input);

        let mut touched = 0;
        for &station_id in station_ids {
            let key = CellKey::new(service_id, station_id);
            if !self.contains(key) {
                tracing::debug!(service_id, station_id, "Skipping stale bulk-edit target");
                continue;
            }
            if let Some(m) = minutes {
                self.write_duration(key, m);
            }
            if let Some(p) = price {
                self.write_price(key, p);
            }
            touched += 1;
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::cell::MatrixCell;
    use crate::matrix::store::tests::sample_store;

    #[test]
    fn turn_on_all_preserves_existing_values() {
        let mut store = sample_store();
        store.set_duration(CellKey::new(1, 12), "40");
        assert_eq!(store.turn_on_all(1), 2);
        assert_eq!(store.cell(CellKey::new(1, 10)), MatrixCell::supported(90, 10));
        assert_eq!(store.cell(CellKey::new(1, 11)), MatrixCell::supported(60, 0));
        assert_eq!(store.cell(CellKey::new(1, 12)), MatrixCell::supported(40, 0));
        assert!(!store.cell(CellKey::new(2, 10)).supported);
    }

    #[test]
    fn turn_off_all_clears_row() {
        let mut store = sample_store();
        store.turn_on_all(2);
        assert_eq!(store.turn_off_all(2), 3);
        assert!(store.row(2).all(|(_, c)| *c == MatrixCell::unsupported()));
        assert!(store.cell(CellKey::new(1, 10)).supported);
    }

    #[test]
    fn unknown_service_is_a_noop() {
        let mut store = sample_store();
        assert_eq!(store.turn_on_all(404), 0);
        assert_eq!(store.turn_off_all(404), 0);
    }

    #[test]
    fn uniform_duration_overwrites_duration_only() {
        let mut store = sample_store();
        assert_eq!(store.apply_duration_to_all_stations(45), 6);
        assert_eq!(store.cell(CellKey::new(1, 10)), MatrixCell::supported(45, 10));
        let off = store.cell(CellKey::new(2, 11));
        assert!(!off.supported);
        assert_eq!(off.duration_minutes, Some(45));
        assert_eq!(off.price_adjustment, None);
    }

    #[test]
    fn uniform_duration_rejects_negative() {
        let mut store = sample_store();
        assert_eq!(store.apply_duration_to_all_stations(-1), 0);
        assert_eq!(store.cell(CellKey::new(1, 10)).duration_minutes, Some(90));
    }

    #[test]
    fn clamp_uniform_duration_bounds() {
        assert_eq!(clamp_uniform_duration(5), 15);
        assert_eq!(clamp_uniform_duration(90), 90);
        assert_eq!(clamp_uniform_duration(500), 180);
    }

    #[test]
    fn bulk_edit_floors_duration() {
        let mut store = sample_store();
        let edit = BulkEdit {
            minutes: Some("2".into()),
            price_adjustment: None,
        };
        assert_eq!(store.bulk_edit_selected_stations(1, &[10], &edit), 1);
        assert_eq!(store.cell(CellKey::new(1, 10)).duration_minutes, Some(5));
        assert_eq!(store.cell(CellKey::new(1, 10)).price_adjustment, Some(10));
    }

    #[test]
    fn bulk_edit_only_touches_selected_stations() {
        let mut store = sample_store();
        store.turn_on_all(1);
        let edit = BulkEdit {
            minutes: Some("75".into()),
            price_adjustment: Some("-10".into()),
        };
        store.bulk_edit_selected_stations(1, &[11, 12], &edit);
        assert_eq!(store.cell(CellKey::new(1, 10)), MatrixCell::supported(90, 10));
        assert_eq!(store.cell(CellKey::new(1, 11)), MatrixCell::supported(75, -10));
        assert_eq!(store.cell(CellKey::new(1, 12)), MatrixCell::supported(75, -10));
    }

    #[test]
    fn bulk_edit_unparseable_input_keeps_draft_values() {
        let mut store = sample_store();
        let edit = BulkEdit {
            minutes: Some("soon".into()),
            price_adjustment: Some("1.5".into()),
        };
        assert_eq!(store.bulk_edit_selected_stations(1, &[10], &edit), 1);
        assert_eq!(store.cell(CellKey::new(1, 10)), MatrixCell::supported(90, 10));
    }

    #[test]
    fn bulk_edit_skips_stale_stations() {
        let mut store = sample_store();
        let edit = BulkEdit {
            minutes: Some("30".into()),
            price_adjustment: None,
        };
        assert_eq!(store.bulk_edit_selected_stations(1, &[10, 77], &edit), 1);
    }
}
