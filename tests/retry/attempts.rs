use outbound_resilience_core::{CorrelationId, Operation, ResilienceError, ResilienceProxy};
use outbound_resilience_retry::{RetryConfig, RetryProxy};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn flaky(failures: usize, calls: &Arc<AtomicUsize>) -> Operation<String> {
    let calls = Arc::clone(calls);
    Operation::new(move || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if attempt <= failures {
                Err(ResilienceError::operation(format!("failure #{attempt}")))
            } else {
                Ok(format!("success on #{attempt}"))
            }
        }
    })
}

#[tokio::test]
async fn single_attempt_runs_once() {
    let retry = RetryProxy::new(RetryConfig::builder().retries(1).build().unwrap());
    let calls = Arc::new(AtomicUsize::new(0));

    let err = retry.execute(flaky(5, &calls), CorrelationId::new()).await.unwrap_err();
    assert!(err.is_retry());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn exhausted_error_wraps_last_failure() {
    let retry = RetryProxy::new(RetryConfig::builder().retries(3).build().unwrap());
    let calls = Arc::new(AtomicUsize::new(0));

    let err = retry.execute(flaky(10, &calls), CorrelationId::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "Retries exceeded after 3 times");
    assert_eq!(err.cause().unwrap().to_string(), "operation failed: failure #3");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn recovers_before_exhaustion() {
    let retry = RetryProxy::new(RetryConfig::builder().retries(4).build().unwrap());
    let calls = Arc::new(AtomicUsize::new(0));

    let value = retry.execute(flaky(3, &calls), CorrelationId::new()).await.unwrap();
    assert_eq!(value, "success on #4");
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn backoff_is_waited_between_attempts_only() {
    let retry = RetryProxy::new(
        RetryConfig::builder()
            .retries(3)
            .backoff(Duration::from_millis(200))
            .build()
            .unwrap(),
    );
    let calls = Arc::new(AtomicUsize::new(0));
    let start = tokio::time::Instant::now();

    let _ = retry.execute(flaky(10, &calls), CorrelationId::new()).await;
    assert_eq!(start.elapsed(), Duration::from_millis(400));
}

#[test]
fn zero_retries_is_rejected() {
    let err = RetryConfig::builder().retries(0).build().err().unwrap();
    assert_eq!(err.parameter(), Some("retries"));
}
