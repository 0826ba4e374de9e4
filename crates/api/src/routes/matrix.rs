//! Route definitions for the service/station matrix.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::matrix;
use crate::state::AppState;

/// Routes mounted at `/matrix`.
///
/// ```text
/// GET    /                                          -> view
/// GET    /status                                    -> status
/// POST   /load                                      -> load
/// POST   /save                                      -> save
/// POST   /cells/{service_id}/{station_id}/toggle    -> toggle_cell
/// PUT    /cells/{service_id}/{station_id}/duration  -> set_duration
/// PUT    /cells/{service_id}/{station_id}/price     -> set_price
/// POST   /services/{id}/enable-all                  -> enable_all
/// POST   /services/{id}/disable-all                 -> disable_all
/// POST   /services/{id}/bulk-edit                   -> bulk_edit
/// POST   /uniform-duration                          -> uniform_duration
/// PUT    /filters                                   -> set_filters
/// PUT    /pages                                     -> set_pages
/// POST   /columns/{station_id}/toggle               -> toggle_column
/// POST   /columns/reorder                           -> reorder_columns
/// POST   /columns/mark-all                          -> mark_all_columns
/// POST   /columns/clear-all                         -> clear_all_columns
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(matrix::view))
        .route("/status", get(matrix::status))
        .route("/load", post(matrix::load))
        .route("/save", post(matrix::save))
        .route(
            "/cells/{service_id}/{station_id}/toggle",
            post(matrix::toggle_cell),
        )
        .route(
            "/cells/{service_id}/{station_id}/duration",
            put(matrix::set_duration),
        )
        .route(
            "/cells/{service_id}/{station_id}/price",
            put(matrix::set_price),
        )
        .route("/services/{id}/enable-all", post(matrix::enable_all))
        .route("/services/{id}/disable-all", post(matrix::disable_all))
        .route("/services/{id}/bulk-edit", post(matrix::bulk_edit))
        .route("/uniform-duration", post(matrix::uniform_duration))
        .route("/filters", put(matrix::set_filters))
        .route("/pages", put(matrix::set_pages))
        .route("/columns/{station_id}/toggle", post(matrix::toggle_column))
        .route("/columns/reorder", post(matrix::reorder_columns))
        .route("/columns/mark-all", post(matrix::mark_all_columns))
        .route("/columns/clear-all", post(matrix::clear_all_columns))
}
