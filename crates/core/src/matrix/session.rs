//! Reconciliation driver: load, edit, diff, write back, reload.
//!
//! ```text
//! Idle -> Loading -> Ready <-> Saving -> Ready
//!            \                    \
//!             +------> Error <-----+
//! ```
//!
//! A failed load leaves the previous store in place. A failed save leaves
//! both the working copy and the baseline untouched, so a retry recomputes
//! the same diff plus whatever was edited in between.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{watch, Mutex};

use super::backend::{BackendError, MatrixBackend, MatrixCatalog, MatrixRow};
use super::bulk::BulkEdit;
use super::cell::CellKey;
use super::columns::{ColumnSelection, ColumnToggle};
use super::store::MatrixStore;
use super::view::{recompute_view, MatrixView, PageSizes, ViewFilters, ViewState};
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Loading,
    Ready,
    Saving,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStage {
    Delete,
    Upsert,
}

impl std::fmt::Display for SaveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Delete => "delete",
            Self::Upsert => "upsert",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("A matrix load or save is already in progress")]
    Busy,

    #[error("Failed to load matrix: {0}")]
    LoadFailed(#[source] BackendError),

    #[error("Failed to save matrix during {stage}: {source}")]
    SaveFailed {
        stage: SaveStage,
        #[source]
        source: BackendError,
    },

    #[error("Matrix sync task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub services: usize,
    pub stations: usize,
    pub rows: usize,
    /// Rows referencing services or stations outside the fetched sets.
    pub dropped_rows: usize,
    /// Selected columns removed because their station is gone.
    pub pruned_columns: Vec<DbId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub deleted: usize,
    pub upserted: usize,
    /// Records that changed persisted state (excludes unchanged re-sends).
    pub changed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub phase: SyncPhase,
    pub last_error: Option<String>,
    pub services: usize,
    pub stations: usize,
    pub selected_columns: usize,
    pub dirty: usize,
}

/// One operator's matrix editing session.
pub struct MatrixSession<B> {
    backend: B,
    phase: watch::Sender<SyncPhase>,
    last_error: Option<String>,
    catalog: MatrixCatalog,
    store: MatrixStore,
    selection: ColumnSelection,
    view: ViewState,
    page_sizes: PageSizes,
    seeded: bool,
}

impl<B: MatrixBackend> MatrixSession<B> {
    pub fn new(backend: B, page_sizes: PageSizes) -> Self {
        let (phase, _) = watch::channel(SyncPhase::Idle);
        Self {
            backend,
            phase,
            last_error: None,
            catalog: MatrixCatalog::default(),
            store: MatrixStore::default(),
            selection: ColumnSelection::new(),
            view: ViewState::default(),
            page_sizes,
            seeded: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    pub fn catalog(&self) -> &MatrixCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &MatrixStore {
        &self.store
    }

    pub fn selection(&self) -> &ColumnSelection {
        &self.selection
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            phase: self.phase(),
            last_error: self.last_error.clone(),
            services: self.catalog.services.len(),
            stations: self.catalog.stations.len(),
            selected_columns: self.selection.len(),
            dirty: self.store.diff().pending_changes(),
        }
    }

    /// Fresh view model for the current state.
    pub fn view(&self) -> MatrixView {
        recompute_view(
            &self.store,
            &self.catalog,
            &self.selection,
            &self.view,
            self.page_sizes,
        )
    }

    fn set_phase(&self, phase: SyncPhase) {
        self.phase.send_replace(phase);
    }

    // -- Cell and bulk edits ------------------------------------------------

    pub fn toggle_cell(&mut self, service_id: DbId, station_id: DbId) -> bool {
        self.store.toggle_supported(CellKey::new(service_id, station_id))
    }

    pub fn set_duration(&mut self, service_id: DbId, station_id: DbId, raw: &str) -> bool {
        self.store.set_duration(CellKey::new(service_id, station_id), raw)
    }

    pub fn set_price_adjustment(&mut self, service_id: DbId, station_id: DbId, raw: &str) -> bool {
        self.store
            .set_price_adjustment(CellKey::new(service_id, station_id), raw)
    }

    pub fn turn_on_all(&mut self, service_id: DbId) -> usize {
        self.store.turn_on_all(service_id)
    }

    pub fn turn_off_all(&mut self, service_id: DbId) -> usize {
        self.store.turn_off_all(service_id)
    }

    /// Callers clamp `minutes` (see `clamp_uniform_duration`) before this.
    pub fn apply_duration_to_all_stations(&mut self, minutes: i32) -> usize {
        self.store.apply_duration_to_all_stations(minutes)
    }

    pub fn bulk_edit_selected_stations(
        &mut self,
        service_id: DbId,
        station_ids: &[DbId],
        edit: &BulkEdit,
    ) -> usize {
        self.store
            .bulk_edit_selected_stations(service_id, station_ids, edit)
    }

    // -- Columns ------------------------------------------------------------

    /// Toggle a column. Removing one resets the column window to page 0.
    /// Stations that are not active are ignored.
    pub fn toggle_column(&mut self, station_id: DbId) -> bool {
        if !self.catalog.has_station(station_id) {
            return false;
        }
        if self.selection.toggle(station_id) == ColumnToggle::Removed {
            self.view.reset_station_page();
        }
        true
    }

    pub fn reorder_columns(&mut self, active_id: DbId, over_id: DbId) -> bool {
        self.selection.reorder(active_id, over_id)
    }

    pub fn mark_all_columns(&mut self) -> usize {
        let station_ids = self.catalog.station_ids();
        self.selection.mark_all(&station_ids)
    }

    pub fn clear_all_columns(&mut self) -> usize {
        let removed = self.selection.clear_all();
        if removed > 0 {
            self.view.reset_station_page();
        }
        removed
    }

    // -- Filters and paging -------------------------------------------------

    pub fn set_filters(&mut self, filters: ViewFilters) {
        self.view.set_filters(filters);
    }

    /// Requests past the last page land on the last page.
    pub fn set_service_page(&mut self, page: usize) {
        self.view.set_service_page(page);
        self.clamp_pages();
    }

    pub fn set_station_page(&mut self, page: usize) {
        self.view.set_station_page(page);
        self.clamp_pages();
    }

    fn clamp_pages(&mut self) {
        let view = self.view();
        self.view.clamp_to(&view);
    }

    // -- Sync ---------------------------------------------------------------

    /// Fetch services, active stations and their matrix rows, then rebuild
    /// the store and its baseline.
    pub async fn load(&mut self) -> Result<LoadSummary, SyncError> {
        self.set_phase(SyncPhase::Loading);
        match self.fetch().await {
            Ok((catalog, rows)) => {
                let summary = self.install(catalog, &rows);
                self.last_error = None;
                self.set_phase(SyncPhase::Ready);
                tracing::info!(
                    services = summary.services,
                    stations = summary.stations,
                    rows = summary.rows,
                    "Matrix loaded",
                );
                Ok(summary)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn fetch(&self) -> Result<(MatrixCatalog, Vec<MatrixRow>), SyncError> {
        let (services, stations) = tokio::try_join!(
            self.backend.list_services(),
            self.backend.list_active_stations(),
        )
        .map_err(SyncError::LoadFailed)?;

        let catalog = MatrixCatalog {
            services,
            stations: stations.into_iter().filter(|s| s.is_active).collect(),
        };
        let rows = self
            .backend
            .list_matrix_rows(&catalog.service_ids(), &catalog.station_ids())
            .await
            .map_err(SyncError::LoadFailed)?;
        Ok((catalog, rows))
    }

    fn install(&mut self, catalog: MatrixCatalog, rows: &[MatrixRow]) -> LoadSummary {
        let station_ids = catalog.station_ids();
        let built = MatrixStore::build(catalog.service_ids(), station_ids.clone(), rows);
        if built.dropped_rows > 0 {
            tracing::warn!(dropped = built.dropped_rows, "Ignoring matrix rows with unknown ids");
        }

        let pruned_columns = if self.seeded {
            self.selection.prune(&station_ids)
        } else {
            self.selection.seed(&station_ids);
            self.seeded = true;
            Vec::new()
        };
        if !pruned_columns.is_empty() {
            tracing::warn!(stations = ?pruned_columns, "Dropped vanished stations from column selection");
        }

        let summary = LoadSummary {
            services: catalog.services.len(),
            stations: catalog.stations.len(),
            rows: rows.len(),
            dropped_rows: built.dropped_rows,
            pruned_columns,
        };

        self.store = built.store;
        self.store.snapshot_baseline();
        self.catalog = catalog;
        self.view.drop_stale_drill(&self.catalog);
        self.clamp_pages();
        summary
    }

    /// Write the pending diff back, deletes first, then reload.
    pub async fn save(&mut self) -> Result<SaveReport, SyncError> {
        let diff = self.store.diff();
        let report = SaveReport {
            deleted: diff.deletes.len(),
            upserted: diff.upserts.len(),
            changed: diff.pending_changes(),
        };
        self.set_phase(SyncPhase::Saving);

        for key in &diff.deletes {
            match self
                .backend
                .delete_matrix_row(key.service_id, key.station_id)
                .await
            {
                Ok(()) => {}
                Err(BackendError::NotFound { .. }) => {
                    tracing::warn!(
                        service_id = key.service_id,
                        station_id = key.station_id,
                        "Matrix row already gone; treating delete as done",
                    );
                }
                Err(source) => {
                    return Err(self.fail(SyncError::SaveFailed {
                        stage: SaveStage::Delete,
                        source,
                    }));
                }
            }
        }

        if !diff.upserts.is_empty() {
            let rows: Vec<MatrixRow> = diff.upserts.iter().map(|u| u.to_row()).collect();
            if let Err(source) = self.backend.upsert_matrix_rows(&rows).await {
                return Err(self.fail(SyncError::SaveFailed {
                    stage: SaveStage::Upsert,
                    source,
                }));
            }
        }

        tracing::info!(
            deleted = report.deleted,
            upserted = report.upserted,
            changed = report.changed,
            "Matrix saved",
        );
        self.load().await?;
        Ok(report)
    }

    fn fail(&mut self, err: SyncError) -> SyncError {
        tracing::error!(error = %err, "Matrix sync failed");
        self.last_error = Some(err.to_string());
        self.set_phase(SyncPhase::Error);
        err
    }
}

// ---------------------------------------------------------------------------
// Shared handle
// ---------------------------------------------------------------------------

/// Cloneable handle owning one [`MatrixSession`].
///
/// `load` and `save` refuse to start while anything else holds the session
/// and run on a spawned task holding the lock, so dropping the caller's
/// future neither cancels the sync nor releases the session before the
/// rebuild lands. Edits wait for the lock.
pub struct MatrixSessionHandle<B> {
    inner: Arc<Mutex<MatrixSession<B>>>,
    phase: watch::Receiver<SyncPhase>,
}

impl<B> Clone for MatrixSessionHandle<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            phase: self.phase.clone(),
        }
    }
}

impl<B: MatrixBackend + 'static> MatrixSessionHandle<B> {
    pub fn new(session: MatrixSession<B>) -> Self {
        let phase = session.phase.subscribe();
        Self {
            inner: Arc::new(Mutex::new(session)),
            phase,
        }
    }

    /// Current phase, readable while a sync holds the session.
    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    pub async fn load(&self) -> Result<LoadSummary, SyncError> {
        let mut session = Arc::clone(&self.inner)
            .try_lock_owned()
            .map_err(|_| SyncError::Busy)?;
        tokio::spawn(async move { session.load().await })
            .await
            .map_err(|e| SyncError::Aborted(e.to_string()))?
    }

    pub async fn save(&self) -> Result<SaveReport, SyncError> {
        let mut session = Arc::clone(&self.inner)
            .try_lock_owned()
            .map_err(|_| SyncError::Busy)?;
        tokio::spawn(async move { session.save().await })
            .await
            .map_err(|e| SyncError::Aborted(e.to_string()))?
    }

    /// Run a synchronous edit against the session.
    pub async fn edit<R>(&self, f: impl FnOnce(&mut MatrixSession<B>) -> R) -> R {
        let mut session = self.inner.lock().await;
        f(&mut session)
    }

    /// Read the session if nothing else holds it right now.
    pub fn try_read<R>(&self, f: impl FnOnce(&MatrixSession<B>) -> R) -> Option<R> {
        let session = self.inner.try_lock().ok()?;
        Some(f(&session))
    }

    /// Read the session without mutating it.
    pub async fn read<R>(&self, f: impl FnOnce(&MatrixSession<B>) -> R) -> R {
        let session = self.inner.lock().await;
        f(&session)
    }
}
