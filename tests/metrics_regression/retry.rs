//! Retry metrics regression tests

use super::helpers::*;
use outbound_resilience_core::{CorrelationId, Operation, ResilienceError, ResilienceProxy};
use outbound_resilience_retry::{RetryConfig, RetryProxy};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn retry_metrics_exist() {
    init_recorder();

    let retry = RetryProxy::new(RetryConfig::builder().name("test_retry").retries(2).build().unwrap());

    let _ = retry.execute(Operation::new(|| async { Ok(1) }), CorrelationId::new()).await;
    let _ = retry
        .execute(
            Operation::<i32>::new(|| async { Err(ResilienceError::operation("nope")) }),
            CorrelationId::new(),
        )
        .await;

    assert_counter_exists("retry_calls_total");
    assert_metric_has_label("retry_calls_total", "retry", "test_retry");
    assert_metric_has_label("retry_calls_total", "outcome", "success");
    assert_metric_has_label("retry_calls_total", "outcome", "exhausted");
}
