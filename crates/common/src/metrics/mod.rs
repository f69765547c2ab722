//! Metrics and observability utilities
//!
//! Prometheus metrics with standardized naming conventions for
//! dispatched dashboard actions and per-store query latency.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

use crate::errors::StoreKind;

/// Metrics prefix for all ScholarLens metrics
pub const METRICS_PREFIX: &str = "scholarlens";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_actions_total", METRICS_PREFIX),
        Unit::Count,
        "Total dashboard actions dispatched"
    );

    describe_histogram!(
        format!("{}_action_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Dashboard action latency in seconds"
    );

    describe_counter!(
        format!("{}_store_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total queries issued to backing stores"
    );

    describe_histogram!(
        format!("{}_store_query_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Backing-store query latency in seconds"
    );

    describe_counter!(
        format!("{}_store_errors_total", METRICS_PREFIX),
        Unit::Count,
        "Total backing-store failures"
    );

    tracing::info!("Metrics registered");
}

/// Record a completed dashboard action
pub fn record_action(action: &'static str, duration_secs: f64) {
    counter!(
        format!("{}_actions_total", METRICS_PREFIX),
        "action" => action
    )
    .increment(1);

    histogram!(
        format!("{}_action_duration_seconds", METRICS_PREFIX),
        "action" => action
    )
    .record(duration_secs);
}

/// Record a backing-store failure
pub fn record_store_error(store: StoreKind) {
    counter!(
        format!("{}_store_errors_total", METRICS_PREFIX),
        "store" => store.to_string()
    )
    .increment(1);
}

/// Helper to time a backing-store query
pub struct StoreQueryTimer {
    start: Instant,
    store: StoreKind,
    operation: &'static str,
}

impl StoreQueryTimer {
    /// Start timing a store query
    pub fn start(store: StoreKind, operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            store,
            operation,
        }
    }

    /// Record query completion
    pub fn finish(self) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_store_queries_total", METRICS_PREFIX),
            "store" => self.store.to_string(),
            "operation" => self.operation
        )
        .increment(1);

        histogram!(
            format!("{}_store_query_duration_seconds", METRICS_PREFIX),
            "store" => self.store.to_string(),
            "operation" => self.operation
        )
        .record(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics::{
        Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString,
    };
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    struct Inc(Arc<AtomicU64>);

    impl CounterFn for Inc {
        fn increment(&self, value: u64) {
            self.0.fetch_add(value, Ordering::SeqCst);
        }

        fn absolute(&self, _value: u64) {}
    }

    /// Counts counter increments; gauges and histograms are no-ops.
    #[derive(Default)]
    struct CountingRecorder {
        increments: Arc<AtomicU64>,
    }

    impl Recorder for CountingRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, _: &Key, _: &Metadata<'_>) -> Counter {
            Counter::from_arc(Arc::new(Inc(self.increments.clone())))
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn test_store_error_moves_the_counter() {
        let recorder = CountingRecorder::default();
        let increments = recorder.increments.clone();

        metrics::with_local_recorder(&recorder, || {
            record_store_error(StoreKind::Graph);
            record_store_error(StoreKind::Document);
        });

        assert_eq!(increments.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_action_recording_increments_once_per_action() {
        let recorder = CountingRecorder::default();
        let increments = recorder.increments.clone();

        metrics::with_local_recorder(&recorder, || {
            record_action("search", 0.01);
        });

        assert_eq!(increments.load(Ordering::SeqCst), 1);
    }
}
