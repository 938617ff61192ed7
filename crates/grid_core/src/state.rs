use crate::pagination::calculate_total_pages;
use crate::pipeline::{self, PipelineQuery};
use crate::view_model::{GridViewModel, PaginationView};
use crate::{
    page_window, ConfigError, GridConfig, GridOptions, RequestId, RequestParams, Row, RowSource,
};

/// Async bookkeeping: last fetched page, total, and loading flags.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridData {
    pub rows: Vec<Row>,
    pub total: u64,
    pub loading: bool,
    /// Count and rows are both being refetched; false means page-only.
    pub loading_full: bool,
    pub first_loaded: bool,
}

/// Everything one grid instance owns. Mutated only through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridState {
    options: GridOptions,
    config: GridConfig,
    predicate: Option<String>,
    reverse: bool,
    search_term: Option<String>,
    pending_search: Option<String>,
    search_generation: u64,
    current_page: u32,
    display_limit: usize,
    start_from: usize,
    data: GridData,
    mounted: bool,
    reconcile_pending: bool,
    last_request_id: RequestId,
    latest_count_request: Option<RequestId>,
    latest_page_request: Option<RequestId>,
    dirty: bool,
}

impl GridState {
    pub fn new(options: GridOptions, config: GridConfig) -> Result<Self, ConfigError> {
        options.validate()?;
        let display_limit = options
            .default_page_limit
            .filter(|limit| *limit > 0)
            .unwrap_or(config.default_page_limit());
        let mut state = Self {
            options,
            config,
            current_page: 1,
            display_limit,
            ..Self::default()
        };
        if let Some((field, reverse)) = state.options.parsed_default_sorting() {
            state.predicate = Some(field);
            state.reverse = reverse;
        }
        Ok(state)
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn predicate(&self) -> Option<&str> {
        self.predicate.as_deref()
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn display_limit(&self) -> usize {
        self.display_limit
    }

    pub fn start_from(&self) -> usize {
        self.start_from
    }

    pub fn data(&self) -> &GridData {
        &self.data
    }

    pub fn is_async(&self) -> bool {
        self.options.is_async()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn reconcile_pending(&self) -> bool {
        self.reconcile_pending
    }

    /// Search input received but not yet committed.
    pub fn has_pending_search(&self) -> bool {
        self.pending_search.is_some()
    }

    /// Items the pagination control pages over.
    pub fn record_count(&self) -> u64 {
        match &self.options.source {
            RowSource::Async => self.data.total,
            RowSource::Local(rows) if self.options.enable_search => {
                pipeline::matching_count(rows, self.search_term()) as u64
            }
            RowSource::Local(rows) => rows.len() as u64,
        }
    }

    pub fn total_pages(&self) -> u32 {
        calculate_total_pages(self.record_count(), self.display_limit)
    }

    pub fn visible_rows(&self) -> Vec<&Row> {
        match &self.options.source {
            RowSource::Async => self.data.rows.iter().collect(),
            RowSource::Local(rows) => {
                let query = PipelineQuery {
                    term: if self.options.enable_search {
                        self.search_term()
                    } else {
                        None
                    },
                    predicate: self.predicate(),
                    reverse: self.reverse,
                    start_from: self.start_from,
                    limit: (!self.options.disable_pagination).then_some(self.display_limit),
                };
                pipeline::visible_rows(rows, &query)
            }
        }
    }

    pub fn request_params(&self) -> RequestParams {
        RequestParams {
            term: self.search_term.clone(),
            orderby: RequestParams::orderby(self.predicate(), self.reverse),
            skip: self.start_from,
            take: self.display_limit,
            page: self.current_page,
            limit: self.display_limit,
            extra: self.options.url_params.clone(),
        }
    }

    /// `"1 - 10 of 327 items"`.
    pub fn status_string(&self) -> String {
        let count = self.record_count();
        let end = (self.start_from as u64 + self.display_limit as u64).min(count);
        format!("{} - {} of {} items", self.start_from + 1, end, count)
    }

    pub fn view(&self) -> GridViewModel {
        let count = self.record_count();
        let full_load = self.data.loading && self.data.loading_full;
        let is_async = self.is_async();
        let pagination = (!self.options.disable_pagination).then(|| {
            let total_pages = self.total_pages();
            PaginationView {
                visible: count > 0 && !full_load,
                pages: page_window(self.current_page, total_pages, self.config.max_size()),
                current_page: self.current_page,
                total_pages,
                no_previous: self.current_page == 1,
                no_next: self.current_page == total_pages,
                display_limit: self.display_limit,
                display_limit_options: self.config.display_limit_options().to_vec(),
                inline_spinner: self.data.loading
                    && !self.data.loading_full
                    && self.data.first_loaded,
                status: self.status_string(),
            }
        });
        GridViewModel {
            rows: self.visible_rows().into_iter().cloned().collect(),
            predicate: self.predicate.clone(),
            reverse: self.reverse,
            search_term: self.search_term.clone(),
            record_count: count,
            show_rows: !full_load,
            show_full_spinner: is_async && (full_load || !self.data.first_loaded),
            show_empty: count == 0 && (!is_async || self.data.first_loaded),
            pagination,
            css: self.config.css().clone(),
        }
    }

    /// Returns and clears the "changed since last render" flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_mounted(&mut self) {
        self.mounted = true;
    }

    pub(crate) fn set_sort(&mut self, predicate: String, reverse: bool) {
        self.predicate = Some(predicate);
        self.reverse = reverse;
    }

    pub(crate) fn set_current_page(&mut self, page: u32) {
        self.current_page = page.max(1);
        self.sync_start_from();
    }

    pub(crate) fn set_display_limit(&mut self, limit: usize) {
        self.display_limit = limit.max(1);
        self.sync_start_from();
    }

    fn sync_start_from(&mut self) {
        self.start_from = (self.current_page as usize - 1) * self.display_limit;
    }

    pub(crate) fn set_local_rows(&mut self, rows: Vec<Row>) -> bool {
        match &mut self.options.source {
            RowSource::Local(current) => {
                *current = rows;
                true
            }
            RowSource::Async => false,
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut GridData {
        &mut self.data
    }

    pub(crate) fn arm_search(&mut self, value: String) -> u64 {
        self.pending_search = Some(value);
        self.search_generation += 1;
        self.search_generation
    }

    pub(crate) fn search_generation(&self) -> u64 {
        self.search_generation
    }

    /// Commits the pending term verbatim; returns false when it equals the committed one.
    pub(crate) fn commit_search(&mut self) -> bool {
        let pending = self.pending_search.take().filter(|term| !term.is_empty());
        if pending == self.search_term {
            return false;
        }
        self.search_term = pending;
        true
    }

    pub(crate) fn set_reconcile_pending(&mut self, pending: bool) {
        self.reconcile_pending = pending;
    }

    /// Also invalidates outstanding page requests; the chained page fetch replaces them.
    pub(crate) fn issue_count_request(&mut self) -> RequestId {
        let id = self.next_request_id();
        self.latest_count_request = Some(id);
        self.latest_page_request = None;
        id
    }

    pub(crate) fn issue_page_request(&mut self) -> RequestId {
        let id = self.next_request_id();
        self.latest_page_request = Some(id);
        id
    }

    pub(crate) fn is_latest_count(&self, id: RequestId) -> bool {
        self.latest_count_request == Some(id)
    }

    pub(crate) fn is_latest_page(&self, id: RequestId) -> bool {
        self.latest_page_request == Some(id)
    }

    fn next_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }
}
