//! Filtering and windowed pagination over both matrix axes.
//!
//! [`recompute_view`] is a pure function of the store, the catalogue, the
//! column selection and the [`ViewState`]. The session calls it after every
//! mutation and hands the resulting [`MatrixView`] to the presentation
//! layer.

use serde::{Deserialize, Serialize};

use super::backend::{MatrixCatalog, ServiceSummary};
use super::cell::{CellKey, MatrixCell};
use super::columns::ColumnSelection;
use super::store::MatrixStore;
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Page sizes
// ---------------------------------------------------------------------------

/// Default number of service rows per page.
pub const SERVICES_PER_PAGE: usize = 10;

/// Default number of station columns per window.
pub const STATIONS_PER_VIEW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSizes {
    pub services_per_page: usize,
    pub stations_per_view: usize,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            services_per_page: SERVICES_PER_PAGE,
            stations_per_view: STATIONS_PER_VIEW,
        }
    }
}

impl PageSizes {
    pub fn new(services_per_page: usize, stations_per_view: usize) -> Result<Self, CoreError> {
        if services_per_page == 0 || stations_per_view == 0 {
            return Err(CoreError::Validation(
                "page sizes must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            services_per_page,
            stations_per_view,
        })
    }
}

/// Highest valid page index for `count` items: `max(0, ceil(count / size) - 1)`.
pub fn max_page(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).saturating_sub(1)
}

/// Position of one axis' window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub page: usize,
    pub max_page: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl Pager {
    pub fn new(page: usize, total: usize, page_size: usize) -> Self {
        let max_page = max_page(total, page_size);
        Self {
            page,
            max_page,
            total,
            has_prev: page > 0,
            has_next: page < max_page,
        }
    }
}

/// Items of page `page`. Empty when the page lies past the end.
fn window<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

// ---------------------------------------------------------------------------
// Filters and view state
// ---------------------------------------------------------------------------

/// Row filters. The supported/duration filters apply only in drill mode,
/// against the drilled station's cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilters {
    #[serde(default)]
    pub search: String,
    pub drill_station_id: Option<DbId>,
    pub supported: Option<bool>,
    pub min_duration: Option<i32>,
    pub max_duration: Option<i32>,
}

impl ViewFilters {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let (Some(min), Some(max)) = (self.min_duration, self.max_duration) {
            if min > max {
                return Err(CoreError::Validation(format!(
                    "min_duration ({min}) must not exceed max_duration ({max})"
                )));
            }
        }
        Ok(())
    }

    fn matches_name(&self, service: &ServiceSummary) -> bool {
        let term = self.search.trim().to_lowercase();
        term.is_empty() || service.name.to_lowercase().contains(&term)
    }

    /// Column-scoped check against the drilled station's cell.
    fn matches_cell(&self, cell: MatrixCell) -> bool {
        let duration = if cell.supported {
            cell.duration_minutes.unwrap_or(0)
        } else {
            0
        };
        if self.supported.is_some_and(|want| want != cell.supported) {
            return false;
        }
        if self.min_duration.is_some_and(|min| duration < min) {
            return false;
        }
        if self.max_duration.is_some_and(|max| duration > max) {
            return false;
        }
        true
    }
}

/// Filters plus the page index of each axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    filters: ViewFilters,
    service_page: usize,
    station_page: usize,
}

impl ViewState {
    pub fn filters(&self) -> &ViewFilters {
        &self.filters
    }

    pub fn service_page(&self) -> usize {
        self.service_page
    }

    pub fn station_page(&self) -> usize {
        self.station_page
    }

    /// Replace all filters. Resets the row page.
    pub fn set_filters(&mut self, filters: ViewFilters) {
        self.filters = filters;
        self.service_page = 0;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.service_page = 0;
    }

    /// Enter (`Some`) or leave (`None`) drill mode. Resets the row page.
    pub fn set_drill_station(&mut self, station_id: Option<DbId>) {
        self.filters.drill_station_id = station_id;
        self.service_page = 0;
    }

    pub fn set_supported_filter(&mut self, supported: Option<bool>) {
        self.filters.supported = supported;
        self.service_page = 0;
    }

    pub fn set_duration_range(&mut self, min: Option<i32>, max: Option<i32>) {
        self.filters.min_duration = min;
        self.filters.max_duration = max;
        self.service_page = 0;
    }

    pub fn set_service_page(&mut self, page: usize) {
        self.service_page = page;
    }

    pub fn set_station_page(&mut self, page: usize) {
        self.station_page = page;
    }

    pub fn reset_station_page(&mut self) {
        self.station_page = 0;
    }

    /// Leave drill mode if the drilled station is no longer active.
    pub fn drop_stale_drill(&mut self, catalog: &MatrixCatalog) -> bool {
        match self.filters.drill_station_id {
            Some(id) if !catalog.has_station(id) => {
                self.set_drill_station(None);
                true
            }
            _ => false,
        }
    }

    /// Pull both page indices back inside the bounds of `view`.
    pub fn clamp_to(&mut self, view: &MatrixView) {
        self.service_page = self.service_page.min(view.services.max_page);
        if let Some(stations) = view.stations {
            self.station_page = self.station_page.min(stations.max_page);
        }
    }
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewColumn {
    pub station_id: DbId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewCell {
    pub station_id: DbId,
    #[serde(flatten)]
    pub cell: MatrixCell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewRow {
    pub service_id: DbId,
    pub name: String,
    pub base_price: i32,
    pub cells: Vec<ViewCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixView {
    pub columns: Vec<ViewColumn>,
    pub rows: Vec<ViewRow>,
    pub drill_mode: bool,
    pub services: Pager,
    /// Column pager; `None` in drill mode.
    pub stations: Option<Pager>,
    pub filters: ViewFilters,
    /// Pending changes relative to the baseline.
    pub dirty: usize,
}

/// Build the visible window of the matrix.
pub fn recompute_view(
    store: &MatrixStore,
    catalog: &MatrixCatalog,
    selection: &ColumnSelection,
    state: &ViewState,
    sizes: PageSizes,
) -> MatrixView {
    let filters = &state.filters;
    let drill = filters
        .drill_station_id
        .and_then(|id| catalog.station(id));

    // Columns: the drilled station alone, or a window over the selection.
    let (columns, station_pager) = match drill {
        Some(station) => (
            vec![ViewColumn {
                station_id: station.id,
                name: station.name.clone(),
            }],
            None,
        ),
        None => {
            let selected: Vec<DbId> = selection
                .ids()
                .iter()
                .copied()
                .filter(|id| catalog.has_station(*id))
                .collect();
            let pager = Pager::new(state.station_page, selected.len(), sizes.stations_per_view);
            let columns = window(&selected, state.station_page, sizes.stations_per_view)
                .iter()
                .filter_map(|id| catalog.station(*id))
                .map(|s| ViewColumn {
                    station_id: s.id,
                    name: s.name.clone(),
                })
                .collect();
            (columns, Some(pager))
        }
    };

    // Rows: name search, plus the drilled column's cell filters.
    let filtered: Vec<&ServiceSummary> = catalog
        .services
        .iter()
        .filter(|service| filters.matches_name(service))
        .filter(|service| match drill {
            Some(station) => filters.matches_cell(store.cell(CellKey::new(service.id, station.id))),
            None => true,
        })
        .collect();

    let service_pager = Pager::new(state.service_page, filtered.len(), sizes.services_per_page);
    let rows = window(&filtered, state.service_page, sizes.services_per_page)
        .iter()
        .map(|service| ViewRow {
            service_id: service.id,
            name: service.name.clone(),
            base_price: service.base_price,
            cells: columns
                .iter()
                .map(|col| ViewCell {
                    station_id: col.station_id,
                    cell: store.cell(CellKey::new(service.id, col.station_id)),
                })
                .collect(),
        })
        .collect();

    MatrixView {
        columns,
        rows,
        drill_mode: drill.is_some(),
        services: service_pager,
        stations: station_pager,
        filters: filters.clone(),
        dirty: store.diff().pending_changes(),
    }
}
