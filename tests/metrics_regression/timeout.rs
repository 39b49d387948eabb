//! Timeout metrics regression tests

use super::helpers::*;
use outbound_resilience_core::{CorrelationId, Operation, ResilienceProxy};
use outbound_resilience_timeout::{TimeoutConfig, TimeoutProxy};
use serial_test::serial;
use std::time::Duration;

#[tokio::test]
#[serial]
async fn timeout_metrics_exist() {
    init_recorder();

    let proxy = TimeoutProxy::new(
        TimeoutConfig::builder()
            .name("test_timeout")
            .timeout(Duration::from_millis(20))
            .build()
            .unwrap(),
    );

    let _ = proxy.execute(Operation::new(|| async { Ok(()) }), CorrelationId::new()).await;
    let slow = Operation::new(|| async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(())
    });
    let _ = proxy.execute(slow, CorrelationId::new()).await;

    assert_counter_exists("timeout_calls_total");
    assert_metric_has_label("timeout_calls_total", "timeout", "test_timeout");
    assert_metric_has_label("timeout_calls_total", "outcome", "success");
    assert_metric_has_label("timeout_calls_total", "outcome", "timeout");
}
