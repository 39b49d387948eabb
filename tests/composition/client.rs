use outbound_resilience::cache::MemoryCacheConfig;
use outbound_resilience::circuitbreaker::CircuitBreakerConfig;
use outbound_resilience::retry::RetryConfig;
use outbound_resilience::timeout::TimeoutConfig;
use outbound_resilience::{CorrelationId, Operation, ResilienceError, ResilientClient};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A fake transport that fails a fixed number of times before answering.
fn transport(failures: usize, calls: &Arc<AtomicUsize>) -> Operation<String> {
    let calls = Arc::clone(calls);
    Operation::from_transport(move || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if n < failures {
                Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"))
            } else {
                Ok(format!("response {n}"))
            }
        }
    })
}

fn external_api_client() -> ResilientClient<String> {
    ResilientClient::builder()
        .use_memory_cache(
            MemoryCacheConfig::builder()
                .expiration(Duration::from_secs(30))
                .build()
                .unwrap(),
        )
        .use_retry(1, RetryConfig::builder().retries(3).build().unwrap())
        .unwrap()
        .use_circuit_breaker(2, CircuitBreakerConfig::builder().max_failed_calls(5).build().unwrap())
        .unwrap()
        .use_timeout(3, TimeoutConfig::builder().timeout(Duration::from_secs(2)).build().unwrap())
        .unwrap()
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_hidden_and_cached() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let client = external_api_client();
    let calls = Arc::new(AtomicUsize::new(0));

    let body = client
        .execute(Some("/users/1"), transport(2, &calls), CorrelationId::new())
        .await
        .unwrap();
    assert_eq!(body, "response 2");
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let cached = client
        .execute(Some("/users/1"), transport(0, &calls), CorrelationId::new())
        .await
        .unwrap();
    assert_eq!(cached, body);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn miss_failure_wraps_pipeline_error_in_cache_error() {
    let client = external_api_client();
    let calls = Arc::new(AtomicUsize::new(0));

    let err = client
        .execute(Some("/users/2"), transport(usize::MAX, &calls), CorrelationId::new())
        .await
        .unwrap_err();

    assert!(err.is_cache());
    assert!(err.cause().unwrap().is_retry());
    let io = err.downcast_ref::<std::io::Error>().unwrap();
    assert_eq!(io.kind(), std::io::ErrorKind::ConnectionReset);
}

#[tokio::test(start_paused = true)]
async fn uncached_calls_still_get_resilience() {
    let client = external_api_client();
    let calls = Arc::new(AtomicUsize::new(0));

    client.execute(None, transport(1, &calls), CorrelationId::new()).await.unwrap();
    client.execute(None, transport(0, &calls), CorrelationId::new()).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn custom_proxy_joins_the_pipeline() {
    let client = ResilientClient::<u8>::builder()
        .add_proxy(1, outbound_resilience::core::ErrorProxy::new("maintenance window"))
        .unwrap()
        .build()
        .unwrap();

    let op = Operation::new(|| async { Ok::<u8, ResilienceError>(1) });
    let err = client.execute(None, op, CorrelationId::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "operation failed: maintenance window");
}
