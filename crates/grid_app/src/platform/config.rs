//! Optional `./.grid_config.ron` with widget-wide defaults and column setup.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use grid_core::{ColumnSpec, CssClassPatch, DisplayLimitOption, GridConfig};
use serde::{Deserialize, Serialize};

const CONFIG_FILENAME: &str = ".grid_config.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PersistedLimit {
    text: String,
    value: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct PersistedCss {
    table: Option<String>,
    th: Option<String>,
    footer: Option<String>,
}

impl From<PersistedCss> for CssClassPatch {
    fn from(css: PersistedCss) -> Self {
        CssClassPatch {
            table: css.table,
            th: css.th,
            footer: css.footer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PersistedColumn {
    field: String,
    name: String,
    #[serde(default)]
    sortable: Option<bool>,
    #[serde(default)]
    hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct PersistedConfig {
    default_page_limit: Option<usize>,
    display_limit_options: Vec<PersistedLimit>,
    css: PersistedCss,
    append_css: PersistedCss,
    max_size: Option<u32>,
    search_debounce_ms: Option<u64>,
    reconcile_delay_ms: Option<u64>,
    columns: Vec<PersistedColumn>,
    default_sorting: Option<String>,
    url_params: BTreeMap<String, String>,
    disable_search: bool,
    disable_pagination: bool,
}

/// Everything the host reads from disk before building a grid.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AppSettings {
    pub grid: GridConfig,
    /// Empty means "derive from the first row".
    pub columns: Vec<ColumnSpec>,
    pub default_sorting: Option<String>,
    pub url_params: BTreeMap<String, String>,
    pub enable_search: bool,
    pub disable_pagination: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            columns: Vec::new(),
            default_sorting: None,
            url_params: BTreeMap::new(),
            enable_search: true,
            disable_pagination: false,
        }
    }
}

pub(crate) fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILENAME)
}

/// Missing, unreadable or invalid files fall back to defaults.
pub(crate) fn load_settings(dir: &Path) -> AppSettings {
    let path = config_path(dir);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppSettings::default();
        }
        Err(err) => {
            engine_warn!("Failed to read grid config from {:?}: {}", path, err);
            return AppSettings::default();
        }
    };

    let persisted: PersistedConfig = match ron::from_str(&content) {
        Ok(persisted) => persisted,
        Err(err) => {
            engine_warn!("Failed to parse grid config from {:?}: {}", path, err);
            return AppSettings::default();
        }
    };

    engine_info!("Loaded grid config from {:?}", path);
    apply(persisted)
}

/// Writes a config file with every default spelled out, for editing.
pub(crate) fn write_default_config(dir: &Path) -> anyhow::Result<PathBuf> {
    let defaults = GridConfig::default();
    let persisted = PersistedConfig {
        default_page_limit: Some(defaults.default_page_limit()),
        display_limit_options: defaults
            .display_limit_options()
            .iter()
            .map(|option| PersistedLimit {
                text: option.text.clone(),
                value: option.value,
            })
            .collect(),
        max_size: defaults.max_size(),
        search_debounce_ms: Some(defaults.search_debounce().as_millis() as u64),
        reconcile_delay_ms: Some(defaults.reconcile_delay().as_millis() as u64),
        ..PersistedConfig::default()
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(&persisted, pretty)?;
    let path = config_path(dir);
    fs::write(&path, content)?;
    engine_info!("Wrote default grid config to {:?}", path);
    Ok(path)
}

fn apply(persisted: PersistedConfig) -> AppSettings {
    let mut grid = GridConfig::default();
    grid.set_default_page_limit(persisted.default_page_limit);
    if !persisted.display_limit_options.is_empty() {
        let options = persisted
            .display_limit_options
            .into_iter()
            .map(|limit| DisplayLimitOption::new(limit.text, limit.value));
        if let Err(err) = grid.set_display_limit_options(options) {
            engine_warn!("Ignoring display limit options: {}", err);
        }
    }
    grid.set_css_class(persisted.css.into());
    grid.append_css_class(persisted.append_css.into());
    if let Some(max_size) = persisted.max_size {
        grid.set_max_size(Some(max_size));
    }
    if let Some(ms) = persisted.search_debounce_ms {
        grid.set_search_debounce(Duration::from_millis(ms));
    }
    if let Some(ms) = persisted.reconcile_delay_ms {
        grid.set_reconcile_delay(Duration::from_millis(ms));
    }

    let columns = persisted
        .columns
        .into_iter()
        .map(|column| {
            let mut spec = ColumnSpec::new(column.field, column.name);
            spec.sortable = column.sortable;
            if column.hidden {
                spec.style.visible = Some(false);
            }
            spec
        })
        .collect();

    AppSettings {
        grid,
        columns,
        default_sorting: persisted.default_sorting,
        url_params: persisted.url_params,
        enable_search: !persisted.disable_search,
        disable_pagination: persisted.disable_pagination,
    }
}
