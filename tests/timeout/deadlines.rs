use outbound_resilience_core::{CorrelationId, Operation, ResilienceError, ResilienceProxy};
use outbound_resilience_timeout::{TimeoutConfig, TimeoutProxy};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

fn sleeping(ms: u64) -> Operation<u64> {
    Operation::new(move || async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(ms)
    })
}

fn proxy(ms: u64, cancel: bool) -> TimeoutProxy {
    TimeoutProxy::new(
        TimeoutConfig::builder()
            .timeout(Duration::from_millis(ms))
            .cancel_running_future(cancel)
            .build()
            .unwrap(),
    )
}

#[tokio::test(start_paused = true)]
async fn completes_just_before_deadline() {
    let value = proxy(100, false).execute(sleeping(99), CorrelationId::new()).await.unwrap();
    assert_eq!(value, 99);
}

#[tokio::test(start_paused = true)]
async fn expires_when_operation_is_slower() {
    let start = tokio::time::Instant::now();
    let err = proxy(100, false).execute(sleeping(101), CorrelationId::new()).await.unwrap_err();

    assert!(err.is_timeout());
    assert!(err.cause().is_none());
    assert_eq!(err.to_string(), "Timeout occurred after 100ms");
    assert_eq!(start.elapsed(), Duration::from_millis(100));
}

#[tokio::test]
async fn operation_failure_is_normalized() {
    let op = Operation::<()>::new(|| async { Err(ResilienceError::operation("refused")) });
    let err = proxy(1000, false).execute(op, CorrelationId::new()).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.to_string(), "Timeout failed");
    assert!(err.cause().unwrap().is_operation());
}

#[tokio::test(start_paused = true)]
async fn detached_operation_keeps_running() {
    let finished = Arc::new(AtomicBool::new(false));
    let f = Arc::clone(&finished);
    let op = Operation::new(move || {
        let f = Arc::clone(&f);
        async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            f.store(true, Ordering::SeqCst);
            Ok(())
        }
    });

    assert!(proxy(50, false).execute(op, CorrelationId::new()).await.is_err());
    assert!(!finished.load(Ordering::SeqCst));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(finished.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn cancelling_drops_the_operation() {
    let finished = Arc::new(AtomicBool::new(false));
    let f = Arc::clone(&finished);
    let op = Operation::new(move || {
        let f = Arc::clone(&f);
        async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            f.store(true, Ordering::SeqCst);
            Ok(())
        }
    });

    assert!(proxy(50, true).execute(op, CorrelationId::new()).await.is_err());
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!finished.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn listeners_distinguish_outcomes() {
    let successes = Arc::new(AtomicUsize::new(0));
    let timeouts = Arc::new(AtomicUsize::new(0));
    let (s, t) = (Arc::clone(&successes), Arc::clone(&timeouts));

    let proxy = TimeoutProxy::new(
        TimeoutConfig::builder()
            .timeout(Duration::from_millis(100))
            .on_success(move |_| {
                s.fetch_add(1, Ordering::SeqCst);
            })
            .on_timeout(move || {
                t.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap(),
    );

    let _ = proxy.execute(sleeping(10), CorrelationId::new()).await;
    let _ = proxy.execute(sleeping(500), CorrelationId::new()).await;

    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(timeouts.load(Ordering::SeqCst), 1);
}
