//! Route definitions for stations.

use axum::routing::get;
use axum::Router;

use crate::handlers::stations;
use crate::state::AppState;

/// Routes mounted at `/stations`.
///
/// ```text
/// GET    /?include_inactive=false   -> list
/// POST   /                          -> create
/// GET    /catalogue                 -> catalogue
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stations::list).post(stations::create))
        .route("/catalogue", get(stations::catalogue))
}
