use crate::{RequestId, Row};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Widget attached to the host; enables async loading.
    Mounted,
    /// Raw search input (debounced before it is committed).
    SearchChanged(String),
    /// Debounce timer fired for the given arming.
    SearchDebounceElapsed { generation: u64 },
    /// User clicked a column header.
    ColumnHeaderClicked(String),
    /// User picked a page link.
    PageSelected(u32),
    /// User changed rows per page.
    DisplayLimitChanged(usize),
    /// Caller replaced the in-memory collection.
    RowsReplaced(Vec<Row>),
    /// Caller asked for a full reload.
    RefreshRequested,
    /// Caller asked for a re-render; `force` rebuilds the whole widget.
    RecompileRequested { force: bool },
    /// Count request finished.
    CountLoaded {
        request_id: RequestId,
        result: Result<u64, String>,
    },
    /// Page request finished.
    PageLoaded {
        request_id: RequestId,
        result: Result<Vec<Row>, String>,
    },
    /// Reconciliation pulse fired.
    ReconcileElapsed,
    NoOp,
}
