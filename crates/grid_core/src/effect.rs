use std::time::Duration;

use crate::{RenderScope, RequestId, RequestParams};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCount {
        request_id: RequestId,
        params: RequestParams,
    },
    FetchPage {
        request_id: RequestId,
        params: RequestParams,
    },
    /// Replace any pending search timer with a new one.
    ScheduleSearchCommit { generation: u64, delay: Duration },
    /// Arm the single reconciliation pulse.
    ScheduleReconcile { delay: Duration },
    Render(RenderScope),
}
