use outbound_resilience_circuitbreaker::{CircuitBreakerConfig, CircuitState};
use outbound_resilience_core::{CorrelationId, Operation, ResilienceError, ResilienceProxy};
use outbound_resilience_pipeline::ResilientPipelineBuilder;
use outbound_resilience_retry::RetryConfig;
use outbound_resilience_timeout::TimeoutConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn retry_around_timeout_surfaces_retry_error() {
    let pipeline = ResilientPipelineBuilder::<&'static str>::new()
        .use_retry(1, RetryConfig::builder().retries(2).build().unwrap())
        .unwrap()
        .use_timeout(
            2,
            TimeoutConfig::builder()
                .timeout(Duration::from_millis(100))
                .build()
                .unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let slow = Operation::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
        async {
            tokio::time::sleep(Duration::from_millis(150)).await;
            Ok("too late")
        }
    });

    let err = pipeline.execute(slow, CorrelationId::new()).await.unwrap_err();
    assert!(err.is_retry());
    let cause = err.cause().unwrap();
    assert!(cause.is_timeout());
    assert_eq!(cause.to_string(), "Timeout occurred after 100ms");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn retry_around_breaker_stops_hammering_once_open() {
    let pipeline = ResilientPipelineBuilder::<u8>::new()
        .use_retry(1, RetryConfig::builder().retries(5).build().unwrap())
        .unwrap()
        .use_circuit_breaker(
            2,
            CircuitBreakerConfig::builder()
                .max_failed_calls(2)
                .break_duration(Duration::from_secs(30))
                .build()
                .unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let failing = Operation::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
        async { Err(ResilienceError::operation("503")) }
    });

    let err = pipeline.execute(failing, CorrelationId::new()).await.unwrap_err();
    assert!(err.is_retry());
    assert!(err.cause().unwrap().is_circuit_breaker());
    assert_eq!(calls.load(Ordering::SeqCst), 2, "the breaker absorbs the remaining attempts");
    assert_eq!(pipeline.circuit_breakers()[0].state(), CircuitState::Open);
}

#[tokio::test(start_paused = true)]
async fn timeout_around_retry_bounds_the_whole_sequence() {
    let pipeline = ResilientPipelineBuilder::<u8>::new()
        .use_timeout(
            1,
            TimeoutConfig::builder()
                .timeout(Duration::from_millis(250))
                .build()
                .unwrap(),
        )
        .unwrap()
        .use_retry(
            2,
            RetryConfig::builder()
                .retries(10)
                .backoff(Duration::from_millis(100))
                .build()
                .unwrap(),
        )
        .unwrap()
        .build()
        .unwrap();

    let failing = Operation::<u8>::new(|| async { Err(ResilienceError::operation("flaky")) });
    let start = tokio::time::Instant::now();

    let err = pipeline.execute(failing, CorrelationId::new()).await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(start.elapsed(), Duration::from_millis(250));
}
