//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope.

use salon_core::matrix::MatrixView;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Outcome of a matrix operation alongside the recomputed view.
#[derive(Debug, Serialize)]
pub struct MatrixOutcome<T: Serialize> {
    pub result: T,
    pub view: MatrixView,
}
