//! Handlers for the `/services` resource.
//!
//! New services appear in the matrix on the next load.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use salon_core::catalog::{validate_base_price, validate_description, validate_service_name};
use salon_db::models::service::CreateService;
use salon_db::repositories::ServiceRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/services
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let services = ServiceRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: services }))
}

/// POST /api/v1/services
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateService>,
) -> AppResult<impl IntoResponse> {
    validate_service_name(&input.name)?;
    validate_base_price(input.base_price)?;
    validate_description(input.description.as_deref())?;

    let service = ServiceRepo::create(&state.pool, &input).await?;
    tracing::info!(service_id = service.id, name = %service.name, "Service created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: service })))
}
