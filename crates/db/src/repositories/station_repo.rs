//! Repository for the `stations` table.

use salon_core::types::DbId;
use sqlx::PgPool;

use crate::models::station::{CreateStation, Station, UpdateStation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, is_active, display_order, created_at, updated_at";

/// Provides CRUD operations for stations.
pub struct StationRepo;

impl StationRepo {
    /// Insert a new station, returning the created row.
    ///
    /// Fails with a `uq_stations_name` violation on a duplicate name.
    pub async fn create(pool: &PgPool, input: &CreateStation) -> Result<Station, sqlx::Error> {
        let query = format!(
            "INSERT INTO stations (name, is_active, display_order) \
             VALUES ($1, COALESCE($2, true), $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Station>(&query)
            .bind(&input.name)
            .bind(input.is_active)
            .bind(input.display_order)
            .fetch_one(pool)
            .await
    }

    /// Find a station by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Station>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stations WHERE id = $1");
        sqlx::query_as::<_, Station>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List stations, optionally including inactive ones.
    ///
    /// Ordered by display_order (unset last), then name.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Station>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM stations ORDER BY display_order NULLS LAST, name")
        } else {
            format!(
                "SELECT {COLUMNS} FROM stations WHERE is_active = true \
                 ORDER BY display_order NULLS LAST, name"
            )
        };
        sqlx::query_as::<_, Station>(&query).fetch_all(pool).await
    }

    /// Update a station. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStation,
    ) -> Result<Option<Station>, sqlx::Error> {
        let query = format!(
            "UPDATE stations SET \
                name = COALESCE($2, name), \
                is_active = COALESCE($3, is_active), \
                display_order = COALESCE($4, display_order) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Station>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.is_active)
            .bind(input.display_order)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a station (set is_active = false). Its matrix rows stay
    /// in place but drop out of every active-station load.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE stations SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
