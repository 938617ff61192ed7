//! Widget-wide configuration, read once when a grid is constructed.
use std::time::Duration;

use crate::ConfigError;

pub const DEFAULT_PAGE_LIMIT: usize = 10;
pub const DEFAULT_MAX_SIZE: u32 = 3;
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(1000);
pub const DEFAULT_RECONCILE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLimitOption {
    pub text: String,
    pub value: usize,
}

impl DisplayLimitOption {
    pub fn new(text: impl Into<String>, value: usize) -> Self {
        Self {
            text: text.into(),
            value,
        }
    }
}

impl From<usize> for DisplayLimitOption {
    fn from(value: usize) -> Self {
        Self::new(value.to_string(), value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssClasses {
    pub table: String,
    pub th: String,
    pub footer: String,
}

impl Default for CssClasses {
    fn default() -> Self {
        Self {
            table: "table table-striped table-bordered m-grid-table".to_string(),
            th: "m-grid-th".to_string(),
            footer: "m-grid-footer".to_string(),
        }
    }
}

/// Partial class override; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssClassPatch {
    pub table: Option<String>,
    pub th: Option<String>,
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    default_page_limit: usize,
    display_limit_options: Vec<DisplayLimitOption>,
    css: CssClasses,
    max_size: Option<u32>,
    search_debounce: Duration,
    reconcile_delay: Duration,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_page_limit: DEFAULT_PAGE_LIMIT,
            display_limit_options: [10, 20, 50, 100]
                .into_iter()
                .map(DisplayLimitOption::from)
                .collect(),
            css: CssClasses::default(),
            max_size: Some(DEFAULT_MAX_SIZE),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            reconcile_delay: DEFAULT_RECONCILE_DELAY,
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_page_limit(&self) -> usize {
        self.default_page_limit
    }

    pub fn display_limit_options(&self) -> &[DisplayLimitOption] {
        &self.display_limit_options
    }

    pub fn css(&self) -> &CssClasses {
        &self.css
    }

    pub fn max_size(&self) -> Option<u32> {
        self.max_size
    }

    pub fn search_debounce(&self) -> Duration {
        self.search_debounce
    }

    pub fn reconcile_delay(&self) -> Duration {
        self.reconcile_delay
    }

    /// A missing or zero limit falls back to [`DEFAULT_PAGE_LIMIT`].
    pub fn set_default_page_limit(&mut self, limit: Option<usize>) {
        self.default_page_limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_LIMIT);
    }

    pub fn set_display_limit_options<I, O>(&mut self, options: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = O>,
        O: Into<DisplayLimitOption>,
    {
        let options: Vec<DisplayLimitOption> = options.into_iter().map(Into::into).collect();
        if options.is_empty() {
            return Err(ConfigError::EmptyDisplayLimitOptions);
        }
        if let Some(bad) = options.iter().find(|o| o.value == 0) {
            return Err(ConfigError::InvalidDisplayLimit {
                text: bad.text.clone(),
            });
        }
        self.display_limit_options = options;
        Ok(())
    }

    pub fn set_css_class(&mut self, patch: CssClassPatch) {
        if let Some(table) = patch.table {
            self.css.table = table;
        }
        if let Some(th) = patch.th {
            self.css.th = th;
        }
        if let Some(footer) = patch.footer {
            self.css.footer = footer;
        }
    }

    pub fn append_css_class(&mut self, patch: CssClassPatch) {
        fn append(target: &mut String, extra: Option<String>) {
            if let Some(extra) = extra {
                target.push(' ');
                target.push_str(&extra);
            }
        }
        append(&mut self.css.table, patch.table);
        append(&mut self.css.th, patch.th);
        append(&mut self.css.footer, patch.footer);
    }

    /// `None` shows every page link.
    pub fn set_max_size(&mut self, max_size: Option<u32>) {
        self.max_size = max_size.filter(|size| *size > 0);
    }

    pub fn set_search_debounce(&mut self, delay: Duration) {
        self.search_debounce = delay;
    }

    pub fn set_reconcile_delay(&mut self, delay: Duration) {
        self.reconcile_delay = delay;
    }
}
