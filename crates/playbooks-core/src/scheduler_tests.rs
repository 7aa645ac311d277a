use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counting(counter: &Arc<AtomicUsize>) -> impl Fn() -> futures::future::Ready<()> + Send + Sync + 'static {
    let counter = counter.clone();
    move || {
        counter.fetch_add(1, Ordering::SeqCst);
        futures::future::ready(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_runs_every_period() {
    let tasks = RecurringTasks::new();
    let runs = Arc::new(AtomicUsize::new(0));

    let handle = tasks
        .schedule("metrics", Duration::from_secs(900), counting(&runs))
        .unwrap();
    assert_eq!(handle.name(), "metrics");

    tokio::time::sleep(Duration::from_secs(899)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(1800)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 3);

    handle.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_runs_and_frees_name() {
    let tasks = RecurringTasks::new();
    let runs = Arc::new(AtomicUsize::new(0));

    let handle = tasks
        .schedule("metrics", Duration::from_secs(10), counting(&runs))
        .unwrap();
    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    handle.cancel();
    assert!(handle.is_cancelled());
    assert!(!tasks.is_scheduled("metrics"));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let again = tasks
        .schedule("metrics", Duration::from_secs(10), counting(&runs))
        .unwrap();
    again.cancel();
}

#[tokio::test]
async fn test_one_live_task_per_name() {
    let tasks = RecurringTasks::new();
    let runs = Arc::new(AtomicUsize::new(0));

    let first = tasks
        .schedule("metrics", Duration::from_secs(60), counting(&runs))
        .unwrap();
    let err = tasks
        .schedule("metrics", Duration::from_secs(60), counting(&runs))
        .err()
        .unwrap();
    assert_eq!(err, SchedulerError::AlreadyScheduled("metrics".to_string()));
    assert_eq!(tasks.len(), 1);

    first.cancel();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_zero_period_rejected() {
    let tasks = RecurringTasks::new();
    let runs = Arc::new(AtomicUsize::new(0));

    let err = tasks
        .schedule("tight", Duration::ZERO, counting(&runs))
        .err()
        .unwrap();
    assert_eq!(err, SchedulerError::ZeroPeriod("tight".to_string()));
    assert!(!tasks.is_scheduled("tight"));
}
