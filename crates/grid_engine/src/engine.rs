use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error, engine_info};
use grid_core::{RequestId, RequestParams};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::fetch::{Fetch, ResolvedSources};
use crate::scheduler::ScheduledTask;
use crate::{EngineEvent, FailureKind, FetchError, GridError};

enum EngineCommand {
    FetchCount {
        request_id: RequestId,
        params: RequestParams,
    },
    FetchPage {
        request_id: RequestId,
        params: RequestParams,
    },
    ArmSearchTimer {
        generation: u64,
        delay: Duration,
    },
    ScheduleReconcile {
        delay: Duration,
    },
    Shutdown,
}

/// Runs fetches and timers on a dedicated runtime thread; results come back as events.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: UnboundedReceiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(sources: Option<ResolvedSources>) -> Result<Self, GridError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = unbounded_channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("grid-engine-worker")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("grid-engine".to_string())
            .spawn(move || run_engine(runtime, sources, cmd_rx, event_tx))?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn fetch_count(&self, request_id: RequestId, params: RequestParams) {
        self.send(EngineCommand::FetchCount { request_id, params });
    }

    pub fn fetch_page(&self, request_id: RequestId, params: RequestParams) {
        self.send(EngineCommand::FetchPage { request_id, params });
    }

    /// Cancels any pending search timer and arms a new one.
    pub fn arm_search_timer(&self, generation: u64, delay: Duration) {
        self.send(EngineCommand::ArmSearchTimer { generation, delay });
    }

    /// Arms the reconciliation pulse, replacing any pulse still pending.
    pub fn schedule_reconcile(&self, delay: Duration) {
        self.send(EngineCommand::ScheduleReconcile { delay });
    }

    pub fn try_recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub async fn recv(&mut self) -> Option<EngineEvent> {
        self.event_rx.recv().await
    }

    /// Cancels timers and in-flight fetches and stops the engine thread.
    /// Pending events are dropped; `recv` returns `None` once the engine is gone.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_error!("grid engine is no longer running; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_engine(
    runtime: Runtime,
    sources: Option<ResolvedSources>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: UnboundedSender<EngineEvent>,
) {
    let cancel = CancellationToken::new();
    let mut search_timer = ScheduledTask::new();
    let mut reconcile_timer = ScheduledTask::new();

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::FetchCount { request_id, params } => {
                let fetcher = sources.as_ref().map(|s| s.count.clone());
                let event_tx = event_tx.clone();
                let cancel = cancel.clone();
                runtime.spawn(async move {
                    if let Some(result) = run_fetch(fetcher, params, cancel).await {
                        let _ = event_tx.send(EngineEvent::CountLoaded { request_id, result });
                    }
                });
            }
            EngineCommand::FetchPage { request_id, params } => {
                let fetcher = sources.as_ref().map(|s| s.data.clone());
                let event_tx = event_tx.clone();
                let cancel = cancel.clone();
                runtime.spawn(async move {
                    if let Some(result) = run_fetch(fetcher, params, cancel).await {
                        let _ = event_tx.send(EngineEvent::PageLoaded { request_id, result });
                    }
                });
            }
            EngineCommand::ArmSearchTimer { generation, delay } => {
                if search_timer.is_pending() {
                    engine_debug!("search timer restarted");
                }
                search_timer.replace(runtime.spawn(fire_after(
                    delay,
                    event_tx.clone(),
                    EngineEvent::SearchTimerElapsed { generation },
                )));
            }
            EngineCommand::ScheduleReconcile { delay } => {
                // Grid state coalesces pulses; every request that reaches here is armed.
                reconcile_timer.replace(runtime.spawn(fire_after(
                    delay,
                    event_tx.clone(),
                    EngineEvent::ReconcileElapsed,
                )));
            }
            EngineCommand::Shutdown => break,
        }
    }

    cancel.cancel();
    search_timer.cancel();
    reconcile_timer.cancel();
    runtime.shutdown_background();
    engine_info!("grid engine stopped");
}

async fn run_fetch<T>(
    fetcher: Option<Arc<dyn Fetch<T>>>,
    params: RequestParams,
    cancel: CancellationToken,
) -> Option<Result<T, FetchError>> {
    let Some(fetcher) = fetcher else {
        return Some(Err(FetchError::new(
            FailureKind::NotConfigured,
            "grid has no fetch capability",
        )));
    };
    tokio::select! {
        _ = cancel.cancelled() => None,
        result = fetcher.fetch(&params) => Some(result),
    }
}

async fn fire_after(delay: Duration, event_tx: UnboundedSender<EngineEvent>, event: EngineEvent) {
    tokio::time::sleep(delay).await;
    let _ = event_tx.send(event);
}
