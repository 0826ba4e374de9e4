pub mod health;
pub mod matrix;
pub mod services;
pub mod stations;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /matrix                                         view, load, save, edits
/// /services                                       list, create
/// /stations                                       list, create, catalogue
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/matrix", matrix::router())
        .nest("/services", services::router())
        .nest("/stations", stations::router())
}
