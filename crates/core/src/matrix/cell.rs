//! The value type for one (service, station) association and the input
//! parsing shared by every cell mutator.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Duration applied when a cell is switched on without a known duration.
pub const DEFAULT_DURATION_MINUTES: i32 = 60;

/// Price adjustment applied when a cell is switched on without a known value.
pub const DEFAULT_PRICE_ADJUSTMENT: i32 = 0;

/// Composite key of the matrix table. Ordered by service, then station, so a
/// range scan over one service yields its whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub service_id: DbId,
    pub station_id: DbId,
}

impl CellKey {
    pub fn new(service_id: DbId, station_id: DbId) -> Self {
        Self {
            service_id,
            station_id,
        }
    }

    /// Inclusive key bounds covering every station of one service.
    pub(crate) fn row_bounds(service_id: DbId) -> std::ops::RangeInclusive<Self> {
        Self::new(service_id, DbId::MIN)..=Self::new(service_id, DbId::MAX)
    }
}

/// One cell of the service/station matrix.
///
/// `supported` is the sole truth for presence. When it is `false` the two
/// values are logically absent even if an edit left something behind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixCell {
    pub supported: bool,
    pub duration_minutes: Option<i32>,
    pub price_adjustment: Option<i32>,
}

impl MatrixCell {
    /// An absent association.
    pub fn unsupported() -> Self {
        Self::default()
    }

    /// A present association with both values set.
    pub fn supported(duration_minutes: i32, price_adjustment: i32) -> Self {
        Self {
            supported: true,
            duration_minutes: Some(duration_minutes),
            price_adjustment: Some(price_adjustment),
        }
    }

    /// The values persistence would store for this cell, defaults filled in.
    ///
    /// `None` when the cell is unsupported.
    pub fn resolved(&self) -> Option<(i32, i32)> {
        self.supported.then(|| {
            (
                self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
                self.price_adjustment.unwrap_or(DEFAULT_PRICE_ADJUSTMENT),
            )
        })
    }

    /// Switch the cell on, keeping any last-known values and defaulting the rest.
    pub(crate) fn enable(&mut self) {
        self.supported = true;
        self.duration_minutes = Some(self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES));
        self.price_adjustment = Some(self.price_adjustment.unwrap_or(DEFAULT_PRICE_ADJUSTMENT));
    }

    /// Switch the cell off and clear both values.
    pub(crate) fn disable(&mut self) {
        *self = Self::unsupported();
    }
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

/// Parse live-typed numeric input as an `i32`.
///
/// Accepts anything that reads as a finite, integer-valued number within
/// `i32` range (`"90"`, `" 90 "`, `"90.0"`, `"-15"`). Rejects blanks,
/// non-numeric text, `NaN`, infinities and fractional values.
pub fn parse_integer_input(raw: &str) -> Option<i32> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    Some(value as i32)
}

/// Parse a duration in minutes: a non-negative integer.
pub fn parse_duration_input(raw: &str) -> Option<i32> {
    parse_integer_input(raw).filter(|minutes| *minutes >= 0)
}

/// Parse a price adjustment: any integer, negative allowed.
pub fn parse_price_input(raw: &str) -> Option<i32> {
    parse_integer_input(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_fills_defaults() {
        let mut cell = MatrixCell::unsupported();
        cell.enable();
        assert_eq!(cell, MatrixCell::supported(DEFAULT_DURATION_MINUTES, DEFAULT_PRICE_ADJUSTMENT));
    }

    #[test]
    fn enable_keeps_last_known_values() {
        let mut cell = MatrixCell {
            supported: false,
            duration_minutes: Some(45),
            price_adjustment: None,
        };
        cell.enable();
        assert_eq!(cell, MatrixCell::supported(45, 0));
    }

    #[test]
    fn disable_clears_values() {
        let mut cell = MatrixCell::supported(90, 10);
        cell.disable();
        assert!(!cell.supported);
        assert_eq!(cell.duration_minutes, None);
        assert_eq!(cell.price_adjustment, None);
    }

    #[test]
    fn resolved_ignores_stale_values_on_unsupported_cells() {
        let stale = MatrixCell {
            supported: false,
            duration_minutes: Some(30),
            price_adjustment: Some(5),
        };
        assert_eq!(stale.resolved(), None);

        let partial = MatrixCell {
            supported: true,
            duration_minutes: None,
            price_adjustment: Some(-5),
        };
        assert_eq!(partial.resolved(), Some((DEFAULT_DURATION_MINUTES, -5)));
    }

    #[test]
    fn duration_input_rejects_bad_shapes() {
        assert_eq!(parse_duration_input("90"), Some(90));
        assert_eq!(parse_duration_input(" 45 "), Some(45));
        assert_eq!(parse_duration_input("30.0"), Some(30));
        assert_eq!(parse_duration_input("0"), Some(0));
        assert_eq!(parse_duration_input("-5"), None);
        assert_eq!(parse_duration_input("abc"), None);
        assert_eq!(parse_duration_input("NaN"), None);
        assert_eq!(parse_duration_input("inf"), None);
        assert_eq!(parse_duration_input("12.5"), None);
        assert_eq!(parse_duration_input(""), None);
    }

    #[test]
    fn price_input_allows_negative() {
        assert_eq!(parse_price_input("-20"), Some(-20));
        assert_eq!(parse_price_input("15"), Some(15));
        assert_eq!(parse_price_input("ten"), None);
        assert_eq!(parse_price_input("99999999999"), None);
    }

    #[test]
    fn keys_order_by_service_then_station() {
        let mut keys = vec![CellKey::new(2, 1), CellKey::new(1, 9), CellKey::new(1, 3)];
        keys.sort();
        assert_eq!(keys, vec![CellKey::new(1, 3), CellKey::new(1, 9), CellKey::new(2, 1)]);
        assert!(CellKey::row_bounds(1).contains(&CellKey::new(1, 42)));
        assert!(!CellKey::row_bounds(1).contains(&CellKey::new(2, 0)));
    }
}
