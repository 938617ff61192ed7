use grid_core::{
    ColumnSpec, ConfigError, CssClassPatch, DisplayLimitOption, GridConfig, GridOptions,
    GridState,
};
use pretty_assertions::assert_eq;

#[test]
fn defaults_match_widget_conventions() {
    let config = GridConfig::default();
    assert_eq!(config.default_page_limit(), 10);
    let values: Vec<_> = config
        .display_limit_options()
        .iter()
        .map(|o| o.value)
        .collect();
    assert_eq!(values, vec![10, 20, 50, 100]);
    assert_eq!(config.max_size(), Some(3));
    assert_eq!(config.css().th, "m-grid-th");
}

#[test]
fn empty_display_limit_options_are_rejected() {
    let mut config = GridConfig::default();
    let err = config
        .set_display_limit_options(Vec::<DisplayLimitOption>::new())
        .unwrap_err();
    assert_eq!(err, ConfigError::EmptyDisplayLimitOptions);
    assert_eq!(config.display_limit_options().len(), 4);

    let err = config
        .set_display_limit_options([DisplayLimitOption::new("none", 0)])
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDisplayLimit { .. }));

    config.set_display_limit_options([5usize, 15]).unwrap();
    assert_eq!(
        config.display_limit_options(),
        &[DisplayLimitOption::new("5", 5), DisplayLimitOption::new("15", 15)]
    );
}

#[test]
fn default_page_limit_falls_back() {
    let mut config = GridConfig::default();
    config.set_default_page_limit(Some(25));
    assert_eq!(config.default_page_limit(), 25);
    config.set_default_page_limit(Some(0));
    assert_eq!(config.default_page_limit(), 10);
    config.set_default_page_limit(None);
    assert_eq!(config.default_page_limit(), 10);
}

#[test]
fn css_classes_can_be_set_or_appended() {
    let mut config = GridConfig::default();
    config.set_css_class(CssClassPatch {
        table: Some("plain".into()),
        ..CssClassPatch::default()
    });
    config.append_css_class(CssClassPatch {
        table: Some("dense".into()),
        footer: Some("sticky".into()),
        ..CssClassPatch::default()
    });
    assert_eq!(config.css().table, "plain dense");
    assert_eq!(config.css().footer, "m-grid-footer sticky");
    assert_eq!(config.css().th, "m-grid-th");
}

#[test]
fn grid_without_columns_is_a_config_error() {
    let err = GridState::new(GridOptions::local(Vec::new(), Vec::new()), GridConfig::default())
        .unwrap_err();
    assert_eq!(err, ConfigError::NoColumns);
}

#[test]
fn per_grid_page_limit_overrides_config() {
    let mut options = GridOptions::local(vec![ColumnSpec::new("a", "A")], Vec::new());
    options.default_page_limit = Some(50);
    let state = GridState::new(options, GridConfig::default()).unwrap();
    assert_eq!(state.display_limit(), 50);
}
