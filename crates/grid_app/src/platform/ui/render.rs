use std::io::Write;

use engine_logging::engine_warn;
use grid_core::filters::field_value;
use grid_core::{ColumnSpec, GridViewModel, PaginationView, RenderScope, Renderer, Row};
use serde_json::Value;

const MAX_CELL_WIDTH: usize = 32;

/// Plain-text table written to any `Write` sink, stdout by default.
pub(crate) struct TextRenderer<W> {
    out: W,
}

impl TextRenderer<std::io::Stdout> {
    pub(crate) fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write + Send> Renderer for TextRenderer<W> {
    fn render(&mut self, scope: RenderScope, columns: &[ColumnSpec], view: &GridViewModel) {
        let text = match scope {
            RenderScope::Full => {
                let mut text = format!(
                    "== grid: {} columns [{}] ==\n",
                    columns.len(),
                    view.css.table
                );
                text.push_str(&render_view(columns, view));
                text
            }
            RenderScope::Body => render_body(columns, view),
            RenderScope::Update => render_view(columns, view),
        };
        if let Err(err) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            engine_warn!("Failed to write grid output: {}", err);
        }
    }
}

/// Search line, table (or spinner / empty state) and pagination footer.
pub(crate) fn render_view(columns: &[ColumnSpec], view: &GridViewModel) -> String {
    let mut out = String::new();
    if let Some(term) = &view.search_term {
        out.push_str(&format!("search: {term}\n"));
    }
    if view.show_full_spinner {
        out.push_str("loading...\n");
    }
    if view.show_rows {
        out.push_str(&render_body(columns, view));
    }
    if view.show_empty {
        out.push_str("No record found\n");
    }
    if let Some(pagination) = &view.pagination {
        if pagination.visible || pagination.inline_spinner {
            out.push_str(&render_footer(pagination));
        }
    }
    out
}

pub(crate) fn render_body(columns: &[ColumnSpec], view: &GridViewModel) -> String {
    let columns: Vec<&ColumnSpec> = columns.iter().filter(|c| c.style.is_visible()).collect();
    let header: Vec<String> = columns
        .iter()
        .map(|column| header_label(column, view))
        .collect();
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| columns.iter().map(|c| cell_text(row, &c.field)).collect())
        .collect();

    let widths: Vec<usize> = (0..columns.len())
        .map(|i| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

/// `« 1 [2] 3 ... »  11 - 20 of 25 items  show: 10 20 50 100`.
pub(crate) fn render_footer(pagination: &PaginationView) -> String {
    let mut parts = Vec::new();
    parts.push(if pagination.no_previous { "«" } else { "<«>" }.to_string());
    for link in &pagination.pages {
        if link.is_active {
            parts.push(format!("[{}]", link.label));
        } else {
            parts.push(link.label.clone());
        }
    }
    parts.push(if pagination.no_next { "»" } else { "<»>" }.to_string());

    let limits: Vec<String> = pagination
        .display_limit_options
        .iter()
        .map(|option| {
            if option.value == pagination.display_limit {
                format!("[{}]", option.text)
            } else {
                option.text.clone()
            }
        })
        .collect();

    let mut line = format!(
        "{}  {}  show: {}",
        parts.join(" "),
        pagination.status,
        limits.join(" ")
    );
    if pagination.inline_spinner {
        line.push_str("  (loading)");
    }
    line.push('\n');
    line
}

fn header_label(column: &ColumnSpec, view: &GridViewModel) -> String {
    match view.predicate.as_deref() {
        Some(field) if field == column.field => {
            let arrow = if view.reverse { "v" } else { "^" };
            format!("{} {arrow}", column.name)
        }
        _ => column.name.clone(),
    }
}

fn cell_text(row: &Row, field: &str) -> String {
    let text = match field_value(row, field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    if text.chars().count() > MAX_CELL_WIDTH {
        let mut cut: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
        cut.push_str("...");
        cut
    } else {
        text
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_core::{GridConfig, GridOptions, GridState};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn columns() -> Vec<ColumnSpec> {
        let mut hidden = ColumnSpec::new("secret", "Secret");
        hidden.style.visible = Some(false);
        vec![
            ColumnSpec::new("id", "Id"),
            ColumnSpec::new("owner.name", "Owner"),
            hidden,
        ]
    }

    fn view(rows: usize) -> GridViewModel {
        let rows = (1..=rows)
            .map(|id| json!({"id": id, "owner": {"name": format!("user {id}")}, "secret": "x"}))
            .collect();
        let mut options = GridOptions::local(columns(), rows);
        options.default_sorting = Some("-id".to_string());
        GridState::new(options, GridConfig::default())
            .unwrap()
            .view()
    }

    #[test]
    fn body_lists_visible_columns_with_sort_marker() {
        let body = render_body(&columns(), &view(2));
        assert_eq!(
            body,
            "Id v | Owner\n\
             -----+-------\n\
             2    | user 2\n\
             1    | user 1\n"
        );
    }

    #[test]
    fn footer_marks_active_page_and_limit() {
        let view = view(45);
        let footer = render_footer(view.pagination.as_ref().unwrap());
        assert_eq!(
            footer,
            "« [1] 2 3 ... <»>  1 - 10 of 45 items  show: [10] 20 50 100\n"
        );
    }

    #[test]
    fn empty_grid_says_so() {
        let text = render_view(&columns(), &view(0));
        assert!(text.contains("No record found"));
        assert!(!text.contains("of 0 items"));
    }

    #[test]
    fn long_cells_are_truncated() {
        let row = json!({"id": "x".repeat(40)});
        let text = cell_text(&row, "id");
        assert_eq!(text.chars().count(), MAX_CELL_WIDTH);
        assert!(text.ends_with("..."));
    }
}
