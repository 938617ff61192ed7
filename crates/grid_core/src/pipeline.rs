//! Local data pipeline: answers "which rows are visible" for an in-memory collection.
//!
//! Nothing is cached; every call recomputes from the source rows.
use crate::filters::{filter_by_term, skip, sort_by, take};
use crate::Row;

/// Snapshot of the state the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineQuery<'q> {
    pub term: Option<&'q str>,
    pub predicate: Option<&'q str>,
    pub reverse: bool,
    pub start_from: usize,
    /// `None` disables the skip/take stage entirely.
    pub limit: Option<usize>,
}

/// Filter, then sort over the whole filtered set, then cut the page.
pub fn visible_rows<'a>(rows: &'a [Row], query: &PipelineQuery<'_>) -> Vec<&'a Row> {
    let mut visible = filter_by_term(rows, query.term);
    if let Some(predicate) = query.predicate {
        visible = sort_by(visible, predicate, query.reverse);
    }
    if let Some(limit) = query.limit {
        visible = take(skip(visible, query.start_from), limit);
    }
    visible
}

/// Rows satisfying the search term, ignoring sort and pagination.
pub fn matching_count(rows: &[Row], term: Option<&str>) -> usize {
    match term {
        Some(t) if !t.is_empty() => filter_by_term(rows, Some(t)).len(),
        _ => rows.len(),
    }
}
