//! Circuit breaker stress tests

use outbound_resilience_circuitbreaker::{CircuitBreakerConfig, CircuitBreakerProxy, CircuitState};
use outbound_resilience_core::{CorrelationId, Operation, ResilienceError, ResilienceProxy};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Test: one shared breaker under heavy concurrent failure
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore]
async fn stress_concurrent_failures_open_once() {
    let opened = Arc::new(AtomicUsize::new(0));
    let o = Arc::clone(&opened);
    let cb = Arc::new(CircuitBreakerProxy::new(
        CircuitBreakerConfig::builder()
            .max_failed_calls(100)
            .break_duration(Duration::from_secs(60))
            .on_state_transition(move |_, to| {
                if to == CircuitState::Open {
                    o.fetch_add(1, Ordering::SeqCst);
                }
            })
            .build()
            .unwrap(),
    ));
    let invoked = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();
    let mut handles = Vec::new();
    for _ in 0..1_000 {
        let cb = Arc::clone(&cb);
        let invoked = Arc::clone(&invoked);
        handles.push(tokio::spawn(async move {
            let op = Operation::<()>::new(move || {
                invoked.fetch_add(1, Ordering::SeqCst);
                async { Err(ResilienceError::operation("down")) }
            });
            let _ = cb.execute(op, CorrelationId::new()).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    println!("1k concurrent failing calls in {:?}", start.elapsed());
    assert_eq!(cb.state(), CircuitState::Open);
    assert_eq!(opened.load(Ordering::SeqCst), 1);
    assert!(invoked.load(Ordering::SeqCst) >= 100);
}

/// Test: high volume of successful calls through a closed breaker
#[tokio::test]
#[ignore]
async fn stress_sequential_successes() {
    let cb = CircuitBreakerProxy::new(CircuitBreakerConfig::builder().build().unwrap());
    let op = Operation::new(|| async { Ok(1u64) });

    let start = Instant::now();
    let mut sum = 0;
    for _ in 0..100_000 {
        sum += cb.execute(op.clone(), CorrelationId::new()).await.unwrap();
    }

    println!("100k sequential calls in {:?}", start.elapsed());
    assert_eq!(sum, 100_000);
    assert_eq!(cb.state(), CircuitState::Closed);
}
