//! Grid core: pure grid state, sequence filters, pagination and the update state machine.
mod config;
mod effect;
mod error;
pub mod filters;
mod msg;
mod options;
pub mod pagination;
mod params;
pub mod pipeline;
mod state;
mod update;
mod view_model;

pub use config::{
    CssClassPatch, CssClasses, DisplayLimitOption, GridConfig, DEFAULT_MAX_SIZE,
    DEFAULT_PAGE_LIMIT, DEFAULT_RECONCILE_DELAY, DEFAULT_SEARCH_DEBOUNCE,
};
pub use effect::Effect;
pub use error::ConfigError;
pub use filters::{coerce_count, Row};
pub use msg::Msg;
pub use options::{ColumnSpec, ColumnStyle, GridOptions, RowSource};
pub use pagination::{calculate_total_pages, page_window, PageLink};
pub use params::{RequestId, RequestParams};
pub use state::{GridData, GridState};
pub use update::update;
pub use view_model::{GridViewModel, PaginationView, RenderScope, Renderer};
