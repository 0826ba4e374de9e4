//! Repository for the `service_stations` table.

use salon_core::matrix::MatrixRow;
use salon_core::types::DbId;
use sqlx::PgPool;

use crate::models::service_station::ServiceStation;

/// Column list for the `service_stations` table.
const COLUMNS: &str =
    "service_id, station_id, duration_minutes, price_adjustment, created_at, updated_at";

/// Provides data access for the service/station matrix.
pub struct ServiceStationRepo;

impl ServiceStationRepo {
    /// List matrix rows whose service and station are both in the given sets.
    pub async fn list_for(
        pool: &PgPool,
        service_ids: &[DbId],
        station_ids: &[DbId],
    ) -> Result<Vec<ServiceStation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM service_stations \
             WHERE service_id = ANY($1) AND station_id = ANY($2) \
             ORDER BY service_id, station_id"
        );
        sqlx::query_as::<_, ServiceStation>(&query)
            .bind(service_ids)
            .bind(station_ids)
            .fetch_all(pool)
            .await
    }

    /// Upsert matrix rows within a transaction. Either every row lands or
    /// none do.
    pub async fn upsert_many(
        pool: &PgPool,
        rows: &[MatrixRow],
    ) -> Result<Vec<ServiceStation>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut results = Vec::with_capacity(rows.len());

        let query = format!(
            "INSERT INTO service_stations \
                (service_id, station_id, duration_minutes, price_adjustment) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (service_id, station_id) \
             DO UPDATE SET duration_minutes = EXCLUDED.duration_minutes, \
                           price_adjustment = EXCLUDED.price_adjustment \
             RETURNING {COLUMNS}"
        );

        for row in rows {
            let saved = sqlx::query_as::<_, ServiceStation>(&query)
                .bind(row.service_id)
                .bind(row.station_id)
                .bind(row.duration_minutes)
                .bind(row.price_adjustment)
                .fetch_one(&mut *tx)
                .await?;
            results.push(saved);
        }

        tx.commit().await?;
        Ok(results)
    }

    /// Delete one matrix row. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        service_id: DbId,
        station_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM service_stations \
             WHERE service_id = $1 AND station_id = $2",
        )
        .bind(service_id)
        .bind(station_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
