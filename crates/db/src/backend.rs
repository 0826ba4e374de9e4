//! [`MatrixBackend`] over PostgreSQL.

use async_trait::async_trait;
use salon_core::matrix::{
    BackendError, MatrixBackend, MatrixRow, ServiceSummary, StationSummary,
};
use salon_core::types::DbId;

use crate::repositories::{ServiceRepo, ServiceStationRepo, StationRepo};
use crate::DbPool;

/// Matrix persistence backed by the `services`, `stations` and
/// `service_stations` tables.
#[derive(Debug, Clone)]
pub struct PgMatrixBackend {
    pool: DbPool,
}

impl PgMatrixBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl MatrixBackend for PgMatrixBackend {
    async fn list_services(&self) -> Result<Vec<ServiceSummary>, BackendError> {
        let services = ServiceRepo::list(&self.pool)
            .await
            .map_err(BackendError::unavailable)?;
        Ok(services.into_iter().map(ServiceSummary::from).collect())
    }

    async fn list_active_stations(&self) -> Result<Vec<StationSummary>, BackendError> {
        let stations = StationRepo::list(&self.pool, false)
            .await
            .map_err(BackendError::unavailable)?;
        Ok(stations.into_iter().map(StationSummary::from).collect())
    }

    async fn list_matrix_rows(
        &self,
        service_ids: &[DbId],
        station_ids: &[DbId],
    ) -> Result<Vec<MatrixRow>, BackendError> {
        if service_ids.is_empty() || station_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = ServiceStationRepo::list_for(&self.pool, service_ids, station_ids)
            .await
            .map_err(BackendError::unavailable)?;
        Ok(rows.into_iter().map(MatrixRow::from).collect())
    }

    async fn delete_matrix_row(
        &self,
        service_id: DbId,
        station_id: DbId,
    ) -> Result<(), BackendError> {
        let removed = ServiceStationRepo::delete(&self.pool, service_id, station_id)
            .await
            .map_err(BackendError::unavailable)?;
        if removed {
            Ok(())
        } else {
            Err(BackendError::NotFound {
                service_id,
                station_id,
            })
        }
    }

    async fn upsert_matrix_rows(&self, rows: &[MatrixRow]) -> Result<(), BackendError> {
        let saved = ServiceStationRepo::upsert_many(&self.pool, rows)
            .await
            .map_err(BackendError::unavailable)?;
        tracing::debug!(rows = saved.len(), "Upserted matrix rows");
        Ok(())
    }
}
