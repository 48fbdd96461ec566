use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::client::runner::MockRunner;
use crate::core::client::ProviderError;
use crate::error::{AutomationError, FlowResult, SchedulerError};
use crate::types::UpkeepPayload;
use crate::worker::observer::{Observer, PayloadSource};
use crate::worker::postprocessors::CombinedPostProcessor;
use crate::worker::scheduler::PipelineScheduler;
use crate::worker::FlowController;

const INTERVAL: Duration = Duration::from_secs(1);

/// Counts fetches, optionally failing every one of them.
struct CountingSource {
    fetches: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl PayloadSource for CountingSource {
    async fn fetch(&self) -> FlowResult<Vec<UpkeepPayload>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Unavailable("offline".to_string()).into());
        }
        Ok(Vec::new())
    }
}

fn scheduler(name: &'static str, fail: bool) -> (PipelineScheduler, Arc<AtomicUsize>) {
    let fetches = Arc::new(AtomicUsize::new(0));
    let mut runner = MockRunner::new();
    runner.expect_check_upkeeps().returning(|_| Ok(Vec::new()));

    let observer = Observer::new(
        name,
        Arc::new(CountingSource { fetches: fetches.clone(), fail }),
        vec![],
        Arc::new(runner),
        Arc::new(CombinedPostProcessor::new(vec![])),
        Duration::from_secs(20),
    );
    (PipelineScheduler::new(Arc::new(observer), INTERVAL), fetches)
}

#[tokio::test(start_paused = true)]
async fn test_ticks_dispatch_a_pass_each_interval() {
    let (scheduler, fetches) = scheduler("ticking", false);
    let scheduler = Arc::new(scheduler);
    let token = CancellationToken::new();

    let running = tokio::spawn({
        let scheduler = scheduler.clone();
        let token = token.clone();
        async move { scheduler.start(token).await }
    });

    tokio::time::sleep(Duration::from_millis(999)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_millis(2501)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 3);

    token.cancel();
    running.await.unwrap().unwrap();
    assert!(!scheduler.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_failing_passes_do_not_stop_the_loop() {
    let (scheduler, fetches) = scheduler("failing", true);
    let scheduler = Arc::new(scheduler);

    let running = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.start(CancellationToken::new()).await }
    });

    tokio::time::sleep(Duration::from_millis(5500)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 5);

    scheduler.close().unwrap();
    running.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_second_start_is_rejected() {
    let (scheduler, _) = scheduler("double", false);
    let scheduler = Arc::new(scheduler);

    let running = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.start(CancellationToken::new()).await }
    });
    tokio::task::yield_now().await;
    assert!(scheduler.is_running());

    assert_matches!(
        scheduler.start(CancellationToken::new()).await,
        Err(SchedulerError::AlreadyRunning(name)) if name == "double"
    );

    scheduler.close().unwrap();
    running.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_close_is_idempotent_and_allows_restart() {
    let (scheduler, fetches) = scheduler("restart", false);
    let scheduler = Arc::new(scheduler);

    // Closing before any start is a no-op.
    scheduler.close().unwrap();
    scheduler.close().unwrap();

    let first = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.start(CancellationToken::new()).await }
    });
    tokio::task::yield_now().await;
    scheduler.close().unwrap();
    scheduler.close().unwrap();
    first.await.unwrap().unwrap();

    let second = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.start(CancellationToken::new()).await }
    });
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    scheduler.close().unwrap();
    second.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_controller_runs_every_flow_until_shutdown() {
    let (first, first_fetches) = scheduler("first", false);
    let (second, second_fetches) = scheduler("second", true);
    let controller = FlowController::new(vec![first, second], CancellationToken::new());

    let running = tokio::spawn({
        let controller = controller.clone();
        async move { controller.run().await }
    });

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(first_fetches.load(Ordering::SeqCst), 2);
    assert_eq!(second_fetches.load(Ordering::SeqCst), 2);

    controller.shutdown().unwrap();
    running.await.unwrap().unwrap();
    assert!(controller.schedulers().iter().all(|scheduler| !scheduler.is_running()));
}

#[tokio::test(start_paused = true)]
async fn test_aborted_start_leaves_scheduler_restartable() {
    let (scheduler, fetches) = scheduler("aborted", false);
    let scheduler = Arc::new(scheduler);

    let first = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.start(CancellationToken::new()).await }
    });
    tokio::task::yield_now().await;
    assert!(scheduler.is_running());

    first.abort();
    assert!(first.await.unwrap_err().is_cancelled());
    assert!(!scheduler.is_running());

    let second = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.start(CancellationToken::new()).await }
    });
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(fetches.load(Ordering::SeqCst), 1);

    scheduler.close().unwrap();
    second.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_controller_keeps_other_flows_running_when_one_fails_to_start() {
    let (first, _) = scheduler("first", false);
    let (second, second_fetches) = scheduler("second", false);
    let token = CancellationToken::new();
    let controller = FlowController::new(vec![first, second], token.clone());

    // "first" is already running outside the controller.
    let outside = tokio::spawn({
        let first = controller.schedulers()[0].clone();
        let token = token.clone();
        async move { first.start(token).await }
    });
    tokio::task::yield_now().await;

    let running = tokio::spawn({
        let controller = controller.clone();
        async move { controller.run().await }
    });

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(second_fetches.load(Ordering::SeqCst), 3);
    assert!(controller.schedulers()[1].is_running());
    assert!(!running.is_finished());

    controller.shutdown().unwrap();
    assert_matches!(
        running.await.unwrap(),
        Err(AutomationError::SchedulerError(SchedulerError::AlreadyRunning(name))) if name == "first"
    );
    outside.await.unwrap().unwrap();
    assert!(controller.schedulers().iter().all(|scheduler| !scheduler.is_running()));

    // Both flows can be started again after the shutdown.
    let second = controller.schedulers()[1].clone();
    let restarted = tokio::spawn({
        let second = second.clone();
        async move { second.start(CancellationToken::new()).await }
    });
    tokio::task::yield_now().await;
    assert!(second.is_running());
    second.close().unwrap();
    restarted.await.unwrap().unwrap();
}
