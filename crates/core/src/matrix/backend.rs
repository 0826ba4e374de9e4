//! The persistence collaborator the matrix driver loads from and saves to.
//!
//! Only the record shapes and the five calls the driver needs are defined
//! here. How they travel (SQL, HTTP, in-memory) is up to the implementor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// A service as the matrix sees it: the row axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub base_price: i32,
    pub is_active: bool,
}

/// A station as the matrix sees it: the column axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSummary {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
    pub display_order: Option<i32>,
}

/// One persisted (service, station) association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub service_id: DbId,
    pub station_id: DbId,
    pub duration_minutes: i32,
    pub price_adjustment: i32,
}

/// Reference data fetched alongside the matrix on every load.
#[derive(Debug, Clone, Default)]
pub struct MatrixCatalog {
    pub services: Vec<ServiceSummary>,
    /// Active stations only, in display order.
    pub stations: Vec<StationSummary>,
}

impl MatrixCatalog {
    pub fn service_ids(&self) -> Vec<DbId> {
        self.services.iter().map(|s| s.id).collect()
    }

    pub fn station_ids(&self) -> Vec<DbId> {
        self.stations.iter().map(|s| s.id).collect()
    }

    pub fn station(&self, id: DbId) -> Option<&StationSummary> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn has_station(&self, id: DbId) -> bool {
        self.station(id).is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The addressed matrix row does not exist. Deletes treat this as success.
    #[error("Matrix row not found: service {service_id} at station {station_id}")]
    NotFound { service_id: DbId, station_id: DbId },

    /// Transport or storage failure.
    #[error("Persistence backend unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    pub fn unavailable(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Unavailable(err.into())
    }
}

/// Remote store for services, stations and matrix rows.
#[async_trait]
pub trait MatrixBackend: Send + Sync {
    async fn list_services(&self) -> Result<Vec<ServiceSummary>, BackendError>;

    async fn list_active_stations(&self) -> Result<Vec<StationSummary>, BackendError>;

    /// All matrix rows whose service and station are both in the given sets.
    async fn list_matrix_rows(
        &self,
        service_ids: &[DbId],
        station_ids: &[DbId],
    ) -> Result<Vec<MatrixRow>, BackendError>;

    /// Remove one row. May fail with [`BackendError::NotFound`].
    async fn delete_matrix_row(
        &self,
        service_id: DbId,
        station_id: DbId,
    ) -> Result<(), BackendError>;

    /// Insert or update rows keyed on `(service_id, station_id)`.
    async fn upsert_matrix_rows(&self, rows: &[MatrixRow]) -> Result<(), BackendError>;
}
