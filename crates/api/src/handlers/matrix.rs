//! Handlers for the `/matrix` resource.
//!
//! Every edit runs against the shared [`MatrixSession`] and answers with
//! the operation's result plus a freshly recomputed view. Nothing reaches
//! the database until `POST /matrix/save`.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use salon_core::matrix::{
    clamp_uniform_duration, BulkEdit, MatrixSession, SessionStatus, SyncPhase, ViewFilters,
};
use salon_core::types::DbId;
use salon_db::PgMatrixBackend;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::{DataResponse, MatrixOutcome};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Raw text typed into a cell. Numbers are accepted and treated as text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CellInput {
    Text(String),
    Number(serde_json::Number),
}

impl CellInput {
    fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CellValueRequest {
    pub value: CellInput,
}

#[derive(Debug, Deserialize)]
pub struct BulkEditRequest {
    pub station_ids: Vec<DbId>,
    #[serde(flatten)]
    pub edit: BulkEdit,
}

#[derive(Debug, Deserialize)]
pub struct UniformDurationRequest {
    pub minutes: i32,
}

#[derive(Debug, Deserialize)]
pub struct PagesRequest {
    pub service_page: Option<usize>,
    pub station_page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub phase: SyncPhase,
    pub busy: bool,
    pub session: Option<SessionStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub active_id: DbId,
    pub over_id: DbId,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Session = MatrixSession<PgMatrixBackend>;

/// Apply `f` to the session and pair its result with the new view.
async fn mutate<T: Serialize>(
    state: &AppState,
    f: impl FnOnce(&mut Session) -> T,
) -> Json<DataResponse<MatrixOutcome<T>>> {
    let (result, view) = state
        .matrix
        .edit(|session| {
            let result = f(session);
            (result, session.view())
        })
        .await;
    Json(DataResponse {
        data: MatrixOutcome { result, view },
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/matrix
pub async fn view(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let view = state.matrix.read(|session| session.view()).await;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/matrix/status
///
/// Answers immediately while a load or save holds the session; `session`
/// is then `null` and only the phase is reported.
pub async fn status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let session = state.matrix.try_read(|session| session.status());
    Ok(Json(DataResponse {
        data: StatusResponse {
            phase: state.matrix.phase(),
            busy: session.is_none(),
            session,
        },
    }))
}

/// POST /api/v1/matrix/load
///
/// Discard local edits and reload from the database.
pub async fn load(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summary = state.matrix.load().await?;
    let view = state.matrix.read(|session| session.view()).await;
    Ok(Json(DataResponse {
        data: MatrixOutcome {
            result: summary,
            view,
        },
    }))
}

/// POST /api/v1/matrix/save
///
/// Write pending changes back (deletes first), then reload.
pub async fn save(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let report = state.matrix.save().await?;
    let view = state.matrix.read(|session| session.view()).await;
    Ok(Json(DataResponse {
        data: MatrixOutcome {
            result: report,
            view,
        },
    }))
}

/// POST /api/v1/matrix/cells/{service_id}/{station_id}/toggle
pub async fn toggle_cell(
    State(state): State<AppState>,
    Path((service_id, station_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    Ok(mutate(&state, |s| s.toggle_cell(service_id, station_id)).await)
}

/// PUT /api/v1/matrix/cells/{service_id}/{station_id}/duration
///
/// Unparseable or negative input leaves the cell unchanged (`result: false`).
pub async fn set_duration(
    State(state): State<AppState>,
    Path((service_id, station_id)): Path<(DbId, DbId)>,
    Json(body): Json<CellValueRequest>,
) -> AppResult<impl IntoResponse> {
    let raw = body.value.as_text();
    Ok(mutate(&state, |s| s.set_duration(service_id, station_id, &raw)).await)
}

/// PUT /api/v1/matrix/cells/{service_id}/{station_id}/price
pub async fn set_price(
    State(state): State<AppState>,
    Path((service_id, station_id)): Path<(DbId, DbId)>,
    Json(body): Json<CellValueRequest>,
) -> AppResult<impl IntoResponse> {
    let raw = body.value.as_text();
    Ok(mutate(&state, |s| s.set_price_adjustment(service_id, station_id, &raw)).await)
}

/// POST /api/v1/matrix/services/{id}/enable-all
pub async fn enable_all(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    Ok(mutate(&state, |s| s.turn_on_all(service_id)).await)
}

/// POST /api/v1/matrix/services/{id}/disable-all
pub async fn disable_all(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    Ok(mutate(&state, |s| s.turn_off_all(service_id)).await)
}

/// POST /api/v1/matrix/services/{id}/bulk-edit
///
/// Body: `{ "station_ids": [..], "minutes": "45", "price_adjustment": "-5" }`.
pub async fn bulk_edit(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
    Json(body): Json<BulkEditRequest>,
) -> AppResult<impl IntoResponse> {
    Ok(mutate(&state, |s| {
        s.bulk_edit_selected_stations(service_id, &body.station_ids, &body.edit)
    })
    .await)
}

/// POST /api/v1/matrix/uniform-duration
///
/// Minutes are clamped to 15..=180 before being written to every cell.
pub async fn uniform_duration(
    State(state): State<AppState>,
    Json(body): Json<UniformDurationRequest>,
) -> AppResult<impl IntoResponse> {
    let minutes = clamp_uniform_duration(body.minutes);
    Ok(mutate(&state, |s| s.apply_duration_to_all_stations(minutes)).await)
}

/// PUT /api/v1/matrix/filters
///
/// Replaces all filters and returns to the first page of services.
pub async fn set_filters(
    State(state): State<AppState>,
    Json(filters): Json<ViewFilters>,
) -> AppResult<impl IntoResponse> {
    filters.validate()?;
    Ok(mutate(&state, |s| s.set_filters(filters)).await)
}

/// PUT /api/v1/matrix/pages
pub async fn set_pages(
    State(state): State<AppState>,
    Json(body): Json<PagesRequest>,
) -> AppResult<impl IntoResponse> {
    Ok(mutate(&state, |s| {
        if let Some(page) = body.service_page {
            s.set_service_page(page);
        }
        if let Some(page) = body.station_page {
            s.set_station_page(page);
        }
    })
    .await)
}

/// POST /api/v1/matrix/columns/{station_id}/toggle
pub async fn toggle_column(
    State(state): State<AppState>,
    Path(station_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    Ok(mutate(&state, |s| s.toggle_column(station_id)).await)
}

/// POST /api/v1/matrix/columns/reorder
///
/// Moves `active_id` into `over_id`'s position.
pub async fn reorder_columns(
    State(state): State<AppState>,
    Json(body): Json<ReorderRequest>,
) -> AppResult<impl IntoResponse> {
    Ok(mutate(&state, |s| s.reorder_columns(body.active_id, body.over_id)).await)
}

/// POST /api/v1/matrix/columns/mark-all
pub async fn mark_all_columns(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(mutate(&state, |s| s.mark_all_columns()).await)
}

/// POST /api/v1/matrix/columns/clear-all
pub async fn clear_all_columns(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(mutate(&state, |s| s.clear_all_columns()).await)
}
