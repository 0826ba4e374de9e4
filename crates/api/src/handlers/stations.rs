//! Handlers for the `/stations` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use salon_core::catalog::validate_station_name;
use salon_core::matrix::{catalogue as column_catalogue, StationSummary};
use salon_db::models::station::CreateStation;
use salon_db::repositories::StationRepo;

use crate::error::AppResult;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/stations?include_inactive=false
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let stations = StationRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: stations }))
}

/// POST /api/v1/stations
///
/// Duplicate names are rejected with 409.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateStation>,
) -> AppResult<impl IntoResponse> {
    validate_station_name(&input.name)?;
    let station = StationRepo::create(&state.pool, &input).await?;
    tracing::info!(station_id = station.id, name = %station.name, "Station created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: station })))
}

/// GET /api/v1/stations/catalogue
///
/// Every station, active or not, with its place in the column selection.
pub async fn catalogue(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stations: Vec<StationSummary> = StationRepo::list(&state.pool, true)
        .await?
        .into_iter()
        .map(StationSummary::from)
        .collect();
    let entries = state
        .matrix
        .read(|session| column_catalogue(&stations, session.selection()))
        .await;
    Ok(Json(DataResponse { data: entries }))
}
