//! Prometheus metrics for the indexer.
//!
//! All metrics are aggregated in the [`Metrics`] struct.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Aggregated metrics for the indexer.
///
/// Metric descriptions are registered with the global registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!(
            "indexer_events_processed_total",
            "Total events reconciled, by kind"
        );
        describe_counter!(
            "indexer_events_failed_total",
            "Total events whose reconciliation was aborted, by kind"
        );
        describe_counter!(
            "indexer_tokens_created_total",
            "Total tokens materialized"
        );
        describe_counter!(
            "indexer_records_written_total",
            "Total entity records written"
        );
        describe_gauge!(
            "indexer_last_indexed_block",
            "Last block whose events are fully reconciled"
        );
        describe_histogram!(
            "indexer_range_duration_seconds",
            "Duration of each scanned block range in seconds"
        );
    }

    /// Record a reconciled event.
    pub fn record_event(&self, kind: &str, records_written: usize, tokens_created: usize) {
        counter!("indexer_events_processed_total", "kind" => kind.to_string()).increment(1);
        counter!("indexer_records_written_total").increment(records_written as u64);
        if tokens_created > 0 {
            counter!("indexer_tokens_created_total").increment(tokens_created as u64);
        }
    }

    /// Record an aborted event.
    pub fn record_failure(&self, kind: &str) {
        counter!("indexer_events_failed_total", "kind" => kind.to_string()).increment(1);
    }

    pub fn set_last_indexed_block(&self, block: u64) {
        gauge!("indexer_last_indexed_block").set(block as f64);
    }

    pub fn record_range(&self, duration: Duration) {
        histogram!("indexer_range_duration_seconds").record(duration.as_secs_f64());
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
