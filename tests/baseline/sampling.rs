use outbound_resilience_baseline::{BaselineConfig, BaselineProxy};
use outbound_resilience_core::{CorrelationId, Operation, ResilienceError, ResilienceProxy};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn taking(ms: u64) -> Operation<()> {
    Operation::new(move || async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(())
    })
}

fn config() -> BaselineConfig {
    BaselineConfig::builder()
        .start_sampling_after(Duration::from_millis(10))
        .max_sample_duration(Duration::from_secs(60))
        .max_samples_count(3)
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn warm_up_calls_are_not_sampled() {
    let proxy = BaselineProxy::new(
        BaselineConfig::builder()
            .start_sampling_after(Duration::from_secs(5))
            .build()
            .unwrap(),
    );

    proxy.execute(taking(100), CorrelationId::new()).await.unwrap();
    let stats = proxy.statistics();
    assert_eq!(stats.samples, 0);
    assert!(!stats.sampling_finished);
}

#[tokio::test(start_paused = true)]
async fn alarm_level_from_uniform_samples() {
    let finished = Arc::new(Mutex::new(None));
    let alarms = Arc::new(Mutex::new(Vec::new()));
    let (f, a) = (Arc::clone(&finished), Arc::clone(&alarms));

    let proxy = BaselineProxy::new(
        BaselineConfig::builder()
            .start_sampling_after(Duration::from_millis(10))
            .max_samples_count(3)
            .on_sampling_finished(move |alarm, samples| *f.lock().unwrap() = Some((alarm, samples)))
            .on_alarm(move |duration| a.lock().unwrap().push(duration))
            .build()
            .unwrap(),
    );

    for _ in 0..3 {
        proxy.execute(taking(100), CorrelationId::new()).await.unwrap();
    }
    assert!(!proxy.statistics().sampling_finished);

    // The next call closes sampling: 1.2 * 100 + 3 * 0.
    proxy.execute(taking(100), CorrelationId::new()).await.unwrap();
    assert_eq!(*finished.lock().unwrap(), Some((120, 3)));
    assert_eq!(proxy.statistics().alarm_level_ms, 120);

    proxy.execute(taking(50), CorrelationId::new()).await.unwrap();
    assert!(alarms.lock().unwrap().is_empty());

    proxy.execute(taking(200), CorrelationId::new()).await.unwrap();
    assert_eq!(*alarms.lock().unwrap(), [Duration::from_millis(200)]);

    let stats = proxy.statistics();
    assert_eq!(stats.min_ms, Some(50));
    assert_eq!(stats.max_ms, Some(200));
}

#[tokio::test(start_paused = true)]
async fn failed_calls_pass_through_unsampled() {
    let proxy = BaselineProxy::new(config());
    tokio::time::advance(Duration::from_millis(20)).await;

    let op = Operation::<()>::new(|| async { Err(ResilienceError::operation("nope")) });
    let err = proxy.execute(op, CorrelationId::new()).await.unwrap_err();
    assert!(err.is_operation());
    assert_eq!(proxy.statistics().samples, 0);
}

#[tokio::test(start_paused = true)]
async fn single_sample_never_alarms() {
    let proxy = BaselineProxy::new(
        BaselineConfig::builder()
            .start_sampling_after(Duration::from_millis(1))
            .max_samples_count(1)
            .build()
            .unwrap(),
    );

    proxy.execute(taking(10), CorrelationId::new()).await.unwrap();
    proxy.execute(taking(10), CorrelationId::new()).await.unwrap();
    assert!(proxy.statistics().sampling_finished);
    assert_eq!(proxy.statistics().alarm_level_ms, 0);

    proxy.execute(taking(10_000), CorrelationId::new()).await.unwrap();
    assert_eq!(proxy.statistics().alarm_level_ms, 0);
}
