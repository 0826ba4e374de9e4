//! Service/station configuration matrix.
//!
//! The [`MatrixStore`] holds an editable working copy of every
//! service/station cell next to the baseline last read from persistence.
//! [`compute_diff`] turns the pair into upserts and deletes, and
//! [`MatrixSession`] drives loading, editing and saving through a
//! [`MatrixBackend`].

pub mod backend;
pub mod bulk;
pub mod cell;
pub mod columns;
pub mod diff;
pub mod session;
pub mod store;
pub mod view;

pub use backend::{
    BackendError, MatrixBackend, MatrixCatalog, MatrixRow, ServiceSummary, StationSummary,
};
pub use bulk::{clamp_uniform_duration, BulkEdit};
pub use cell::{CellKey, MatrixCell, DEFAULT_DURATION_MINUTES, DEFAULT_PRICE_ADJUSTMENT};
pub use columns::{catalogue, CatalogueEntry, ColumnSelection, ColumnToggle};
pub use diff::{compute_diff, DeleteKey, MatrixDiff, UpsertRecord};
pub use session::{
    LoadSummary, MatrixSession, MatrixSessionHandle, SaveReport, SaveStage, SessionStatus,
    SyncError, SyncPhase,
};
pub use store::{CellTable, MatrixStore};
pub use view::{recompute_view, MatrixView, PageSizes, Pager, ViewFilters, ViewState};
