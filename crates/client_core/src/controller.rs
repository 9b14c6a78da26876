//! View-state controller: keeps search, pagination and sort consistent between
//! user events, the derived rows and the URL query string.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use shared::{
    domain::{Order, OrderId},
    error::OrdersLoadError,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    debounce::{SearchDebounce, SEARCH_QUIET_PERIOD},
    source::OrderSource,
    table::{filter_and_sort, last_page_index, page_window, resolve_sort, Column, ColumnSet},
    view_state::{SortDirection, SortState, ViewState},
};

/// Receives the projected query string. Implementations replace the current
/// history entry rather than pushing a new one.
pub trait Navigator {
    fn replace_query(&mut self, query: &str);
}

/// URL-backed navigator holding the single current history entry.
#[derive(Debug, Clone)]
pub struct Location {
    url: Url,
    replacements: usize,
}

impl Location {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).with_context(|| format!("invalid view url '{raw}'"))?;
        Ok(Self::new(url))
    }

    pub fn new(url: Url) -> Self {
        Self {
            url,
            replacements: 0,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn query(&self) -> &str {
        self.url.query().unwrap_or_default()
    }

    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Navigator for Location {
    fn replace_query(&mut self, query: &str) {
        if query.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.set_query(Some(query));
        }
        self.replacements += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Loaded(Arc<[Order]>),
    Failed(OrdersLoadError),
}

pub struct OrdersTableController<N: Navigator> {
    navigator: N,
    view: ViewState,
    load: LoadState,
    latest_load: u64,
    search: SearchDebounce,
    columns: ColumnSet,
    selected: Option<OrderId>,
    grid_attached: bool,
    grid_wired: bool,
}

impl<N: Navigator> OrdersTableController<N> {
    pub fn new(query: &str, navigator: N) -> Self {
        Self::with_search_quiet_period(query, navigator, SEARCH_QUIET_PERIOD)
    }

    pub fn with_search_quiet_period(query: &str, navigator: N, quiet: Duration) -> Self {
        let view = ViewState::from_query(query);
        let mut search = SearchDebounce::new(quiet);
        search.seed(view.search.clone());
        debug!(query, ?view, "initialized view state from url");

        Self {
            navigator,
            view,
            load: LoadState::Loading,
            latest_load: 0,
            search,
            columns: ColumnSet::default(),
            selected: None,
            grid_attached: false,
            grid_wired: false,
        }
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }

    pub fn error_message(&self) -> Option<String> {
        match &self.load {
            LoadState::Failed(err) => Some(err.user_message()),
            _ => None,
        }
    }

    pub fn is_grid_wired(&self) -> bool {
        self.grid_wired
    }

    /// Starts a load; any load started earlier is superseded.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_load += 1;
        self.load = LoadState::Loading;
        LoadTicket(self.latest_load)
    }

    /// Applies a load result. Returns `false` when the ticket was superseded.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Order>, OrdersLoadError>,
    ) -> bool {
        if ticket.0 != self.latest_load {
            debug!(ticket = ticket.0, latest = self.latest_load, "ignoring superseded order load");
            return false;
        }

        match result {
            Ok(orders) => {
                info!(count = orders.len(), "orders loaded");
                self.load = LoadState::Loaded(orders.into());
                if let Some(id) = self.selected.clone() {
                    if self.find_order(&id).is_none() {
                        self.selected = None;
                    }
                }
                self.try_wire_grid();
                if self.clamp_page_index() {
                    self.project_url();
                }
            }
            Err(err) => {
                warn!(%err, "order load failed");
                self.load = LoadState::Failed(err);
                self.selected = None;
            }
        }
        true
    }

    pub async fn load_from(&mut self, source: &dyn OrderSource) -> bool {
        let ticket = self.begin_load();
        let result = source.fetch_orders().await;
        self.finish_load(ticket, result)
    }

    /// Called once the grid widget exists. Wiring completes as soon as data
    /// is also present, which may be later.
    pub fn attach_grid(&mut self) {
        self.grid_attached = true;
        self.try_wire_grid();
    }

    fn try_wire_grid(&mut self) {
        if self.grid_wired || !self.grid_attached || !matches!(self.load, LoadState::Loaded(_)) {
            return;
        }
        self.grid_wired = true;
        debug!(
            page_index = self.view.page_index,
            page_size = self.view.page_size,
            sort = ?self.view.sort,
            "grid wired; page and sort events captured"
        );
    }

    pub fn on_search_input(&mut self, value: &str, now: Instant) {
        self.search.push(value, now);
    }

    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Applies the debounced search value once its quiet window has passed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        let Some(value) = self.search.poll(now) else {
            return false;
        };
        debug!(search = %value, "applying filter");
        self.view.search = value;
        self.clamp_page_index();
        self.project_url();
        true
    }

    /// Header activation cycles asc, desc, none on the same column.
    pub fn on_sort_header(&mut self, column: Column) -> bool {
        let next = match &self.view.sort {
            Some(sort) if sort.field == column.id() => match sort.direction {
                SortDirection::Asc => Some(SortState::new(column.id(), SortDirection::Desc)),
                SortDirection::Desc => None,
            },
            _ => Some(SortState::new(column.id(), SortDirection::Asc)),
        };
        self.on_sort_change(next)
    }

    pub fn on_sort_change(&mut self, sort: Option<SortState>) -> bool {
        if !self.grid_wired {
            debug!("sort event before grid wiring ignored");
            return false;
        }
        self.view.sort = sort;
        self.project_url();
        true
    }

    pub fn on_page_change(&mut self, page_index: usize, page_size: usize) -> bool {
        if !self.grid_wired {
            debug!("page event before grid wiring ignored");
            return false;
        }
        self.view.page_size = page_size.max(1);
        self.view.page_index = page_index;
        self.clamp_page_index();
        self.project_url();
        true
    }

    /// Changes the page size while keeping the first visible row on screen.
    pub fn on_page_size_change(&mut self, page_size: usize) -> bool {
        if !self.grid_wired {
            debug!(page_size, "page size change before grid wiring ignored");
            return false;
        }
        let page_size = page_size.max(1);
        let first_row = self.view.page_index.saturating_mul(self.view.page_size);
        self.on_page_change(first_row / page_size, page_size)
    }

    pub fn filtered_len(&self) -> usize {
        match &self.load {
            LoadState::Loaded(orders) => {
                filter_and_sort(orders, &self.view.search, None).len()
            }
            _ => 0,
        }
    }

    pub fn last_page_index(&self) -> usize {
        last_page_index(self.filtered_len(), self.view.page_size)
    }

    /// Rows of the current page. Empty unless the orders are loaded.
    pub fn visible_rows(&self) -> Vec<&Order> {
        let LoadState::Loaded(orders) = &self.load else {
            return Vec::new();
        };
        let sort = self.view.sort.as_ref().and_then(resolve_sort);
        let rows = filter_and_sort(orders, &self.view.search, sort);
        page_window(&rows, self.view.page_index, self.view.page_size).to_vec()
    }

    pub fn select_order(&mut self, id: &OrderId) {
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
            return;
        }
        if self.find_order(id).is_none() {
            warn!(order_id = %id, "cannot select unknown order");
            return;
        }
        self.selected = Some(id.clone());
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    pub fn selected_order(&self) -> Option<&Order> {
        self.selected.as_ref().and_then(|id| self.find_order(id))
    }

    pub fn toggle_column(&mut self, column: Column) {
        self.columns.toggle(column);
    }

    fn find_order(&self, id: &OrderId) -> Option<&Order> {
        match &self.load {
            LoadState::Loaded(orders) => orders.iter().find(|order| &order.id == id),
            _ => None,
        }
    }

    fn clamp_page_index(&mut self) -> bool {
        if !matches!(self.load, LoadState::Loaded(_)) {
            return false;
        }
        let last = self.last_page_index();
        if self.view.page_index > last {
            debug!(from = self.view.page_index, to = last, "clamping page index");
            self.view.page_index = last;
            return true;
        }
        false
    }

    fn project_url(&mut self) {
        let query = self.view.to_query();
        debug!(%query, "replacing url query");
        self.navigator.replace_query(&query);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
