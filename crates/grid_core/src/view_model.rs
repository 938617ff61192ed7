use crate::{ColumnSpec, CssClasses, DisplayLimitOption, PageLink, Row};

/// Snapshot handed to the render collaborator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridViewModel {
    pub rows: Vec<Row>,
    pub predicate: Option<String>,
    pub reverse: bool,
    pub search_term: Option<String>,
    pub record_count: u64,
    /// False while a full (count + rows) refresh is in flight.
    pub show_rows: bool,
    pub show_full_spinner: bool,
    /// "No record found".
    pub show_empty: bool,
    /// `None` when pagination is disabled for this grid.
    pub pagination: Option<PaginationView>,
    pub css: CssClasses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub visible: bool,
    pub pages: Vec<PageLink>,
    pub current_page: u32,
    pub total_pages: u32,
    pub no_previous: bool,
    pub no_next: bool,
    pub display_limit: usize,
    pub display_limit_options: Vec<DisplayLimitOption>,
    pub inline_spinner: bool,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderScope {
    /// Whole widget, on mount or forced recompile.
    Full,
    /// Row body only.
    Body,
    /// Ordinary refresh pass after state changed.
    Update,
}

/// Produces markup (or any other output) for the current state.
pub trait Renderer: Send {
    fn render(&mut self, scope: RenderScope, columns: &[ColumnSpec], view: &GridViewModel);
}
