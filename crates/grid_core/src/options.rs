use std::collections::BTreeMap;

use crate::{ConfigError, Row};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnStyle {
    pub width: Option<String>,
    pub min_width: Option<String>,
    pub text_align: Option<String>,
    pub visible: Option<bool>,
}

impl ColumnStyle {
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}

/// Caller-owned column description. The grid only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub field: String,
    pub name: String,
    /// Overrides the grid-wide sorting switch when set.
    pub sortable: Option<bool>,
    pub style: ColumnStyle,
    pub format: Option<String>,
    pub cell_template: Option<String>,
}

impl ColumnSpec {
    pub fn new(field: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            name: name.into(),
            sortable: None,
            style: ColumnStyle::default(),
            format: None,
            cell_template: None,
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }
}

/// Where rows come from.
#[derive(Debug, Clone, PartialEq)]
pub enum RowSource {
    /// In-memory collection resolved synchronously by the local pipeline.
    Local(Vec<Row>),
    /// Rows and counts come from injected fetch capabilities.
    Async,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    pub columns: Vec<ColumnSpec>,
    pub source: RowSource,
    pub enable_search: bool,
    pub sorting: bool,
    pub disable_pagination: bool,
    /// `"field"` sorts ascending, `"-field"` descending.
    pub default_sorting: Option<String>,
    pub url_params: BTreeMap<String, String>,
    pub default_page_limit: Option<usize>,
}

impl GridOptions {
    pub fn new(columns: Vec<ColumnSpec>, source: RowSource) -> Self {
        Self {
            columns,
            source,
            enable_search: false,
            sorting: true,
            disable_pagination: false,
            default_sorting: None,
            url_params: BTreeMap::new(),
            default_page_limit: None,
        }
    }

    pub fn local(columns: Vec<ColumnSpec>, rows: Vec<Row>) -> Self {
        Self::new(columns, RowSource::Local(rows))
    }

    pub fn remote(columns: Vec<ColumnSpec>) -> Self {
        Self::new(columns, RowSource::Async)
    }

    pub fn is_async(&self) -> bool {
        matches!(self.source, RowSource::Async)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns.is_empty() {
            return Err(ConfigError::NoColumns);
        }
        Ok(())
    }

    pub fn column(&self, field: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn is_sortable(&self, field: &str) -> bool {
        self.column(field)
            .map(|c| c.sortable.unwrap_or(self.sorting))
            .unwrap_or(false)
    }

    pub(crate) fn parsed_default_sorting(&self) -> Option<(String, bool)> {
        let raw = self.default_sorting.as_deref()?.trim();
        let (field, reverse) = match raw.strip_prefix('-') {
            Some(field) => (field, true),
            None => (raw, false),
        };
        (!field.is_empty()).then(|| (field.to_string(), reverse))
    }
}

impl Default for GridOptions {
    fn default() -> Self {
        Self::local(Vec::new(), Vec::new())
    }
}
