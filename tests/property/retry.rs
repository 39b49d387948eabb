//! Property tests for the retry proxy.
//!
//! Invariants tested:
//! - A permanently failing operation runs exactly `retries` times
//! - Success on attempt k stops after exactly k calls

use outbound_resilience_core::{CorrelationId, Operation, ResilienceError, ResilienceProxy};
use outbound_resilience_retry::{RetryConfig, RetryProxy};
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::runtime::Runtime;

fn flaky(failures: usize, calls: &Arc<AtomicUsize>) -> Operation<usize> {
    let calls = Arc::clone(calls);
    Operation::new(move || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if attempt <= failures {
                Err(ResilienceError::operation("transient"))
            } else {
                Ok(attempt)
            }
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: exhausting retries invokes the operation exactly N times
    #[test]
    fn failing_operation_runs_exactly_retries_times(retries in 1usize..=10) {
        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let calls = Arc::new(AtomicUsize::new(0));
            let proxy = RetryProxy::new(RetryConfig::builder().retries(retries).build().unwrap());

            let result = proxy.execute(flaky(usize::MAX, &calls), CorrelationId::new()).await;
            prop_assert!(result.unwrap_err().is_retry());
            prop_assert_eq!(calls.load(Ordering::SeqCst), retries);
            Ok(())
        })?;
    }

    /// Property: success on attempt k <= N means exactly k invocations
    #[test]
    fn success_stops_retrying(retries in 1usize..=10, succeed_on in 1usize..=10) {
        prop_assume!(succeed_on <= retries);

        let rt = Runtime::new().unwrap();
        rt.block_on(async {
            let calls = Arc::new(AtomicUsize::new(0));
            let proxy = RetryProxy::new(RetryConfig::builder().retries(retries).build().unwrap());

            let attempt = proxy
                .execute(flaky(succeed_on - 1, &calls), CorrelationId::new())
                .await
                .unwrap();
            prop_assert_eq!(attempt, succeed_on);
            prop_assert_eq!(calls.load(Ordering::SeqCst), succeed_on);
            Ok(())
        })?;
    }
}
