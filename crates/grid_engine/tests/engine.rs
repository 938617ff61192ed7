use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use grid_core::{RequestParams, Row};
use grid_engine::{
    AsyncSources, EngineEvent, EngineHandle, FailureKind, FetchCapability, FetchError,
    FetchSettings, ScheduledTask,
};
use pretty_assertions::assert_eq;

async fn next(engine: &mut EngineHandle) -> EngineEvent {
    tokio::time::timeout(Duration::from_secs(2), engine.recv())
        .await
        .expect("event in time")
        .expect("engine running")
}

async fn assert_quiet(engine: &mut EngineHandle, wait: Duration) {
    let got = tokio::time::timeout(wait, engine.recv()).await;
    assert!(got.is_err(), "unexpected event {got:?}");
}

#[tokio::test]
async fn replacing_a_scheduled_task_aborts_the_previous_one() {
    let fired = Arc::new(AtomicUsize::new(0));
    let mut task = ScheduledTask::new();

    for value in [1, 10] {
        let fired = fired.clone();
        task.replace(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            fired.fetch_add(value, Ordering::SeqCst);
        }));
    }
    assert!(task.is_pending());

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 10);
    assert!(!task.is_pending());
    assert!(!task.cancel());
}

#[tokio::test]
async fn cancel_reports_pending_task() {
    let mut task = ScheduledTask::new();
    task.replace(tokio::spawn(async {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }));
    assert!(task.cancel());
    assert!(!task.is_pending());
}

#[tokio::test]
async fn search_timer_restarts_on_every_arm() {
    let mut engine = EngineHandle::new(None).expect("engine");
    engine.arm_search_timer(1, Duration::from_millis(40));
    engine.arm_search_timer(2, Duration::from_millis(40));
    engine.arm_search_timer(3, Duration::from_millis(40));

    assert_eq!(
        next(&mut engine).await,
        EngineEvent::SearchTimerElapsed { generation: 3 }
    );
    assert_quiet(&mut engine, Duration::from_millis(150)).await;
}

#[tokio::test]
async fn rescheduling_reconcile_replaces_the_pending_pulse() {
    let mut engine = EngineHandle::new(None).expect("engine");
    engine.schedule_reconcile(Duration::from_millis(30));
    engine.schedule_reconcile(Duration::from_millis(30));

    assert_eq!(next(&mut engine).await, EngineEvent::ReconcileElapsed);
    assert_quiet(&mut engine, Duration::from_millis(100)).await;

    engine.schedule_reconcile(Duration::from_millis(10));
    assert_eq!(next(&mut engine).await, EngineEvent::ReconcileElapsed);
}

#[tokio::test]
async fn reconcile_rearms_immediately_after_each_pulse() {
    let mut engine = EngineHandle::new(None).expect("engine");
    for _ in 0..500 {
        engine.schedule_reconcile(Duration::ZERO);
        assert_eq!(next(&mut engine).await, EngineEvent::ReconcileElapsed);
    }
}

/// Sets its flag when the owning future is dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn shutdown_cancels_timers_and_in_flight_fetches() {
    let started = Arc::new(AtomicBool::new(false));
    let dropped = Arc::new(AtomicBool::new(false));
    let completed = Arc::new(AtomicBool::new(false));

    let (s, d, c) = (started.clone(), dropped.clone(), completed.clone());
    let sources = AsyncSources::new(
        FetchCapability::from_fn(move |_params: RequestParams| {
            let (s, d, c) = (s.clone(), d.clone(), c.clone());
            async move {
                let _guard = DropFlag(d);
                s.store(true, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(5)).await;
                c.store(true, Ordering::SeqCst);
                Ok::<Vec<Row>, FetchError>(Vec::new())
            }
        }),
        FetchCapability::from_fn(|_params: RequestParams| async { Ok::<_, FetchError>(0) }),
    )
    .resolve(&FetchSettings::default(), &BTreeMap::new())
    .expect("sources");

    let mut engine = EngineHandle::new(Some(sources)).expect("engine");
    engine.fetch_page(1, RequestParams::default());
    tokio::time::timeout(Duration::from_secs(2), async {
        while !started.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("fetch started");
    engine.arm_search_timer(1, Duration::from_millis(50));
    engine.schedule_reconcile(Duration::from_millis(50));
    engine.shutdown();

    let after = tokio::time::timeout(Duration::from_secs(2), engine.recv())
        .await
        .expect("engine stopped in time");
    assert_eq!(after, None);
    tokio::time::timeout(Duration::from_secs(2), async {
        while !dropped.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("fetch future dropped");
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!completed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn fetch_without_sources_reports_not_configured() {
    let mut engine = EngineHandle::new(None).expect("engine");
    engine.fetch_count(7, RequestParams::default());

    match next(&mut engine).await {
        EngineEvent::CountLoaded { request_id, result } => {
            assert_eq!(request_id, 7);
            assert_eq!(result.unwrap_err().kind, FailureKind::NotConfigured);
        }
        other => panic!("unexpected event {other:?}"),
    }
}
