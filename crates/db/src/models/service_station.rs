//! Matrix rows: one per supported (service, station) pair.

use salon_core::matrix::MatrixRow;
use salon_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `service_stations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceStation {
    pub service_id: DbId,
    pub station_id: DbId,
    pub duration_minutes: i32,
    pub price_adjustment: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ServiceStation> for MatrixRow {
    fn from(r: ServiceStation) -> Self {
        Self {
            service_id: r.service_id,
            station_id: r.station_id,
            duration_minutes: r.duration_minutes,
            price_adjustment: r.price_adjustment,
        }
    }
}
