//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rotator_probes_total` (counter): probe attempts by outcome
//! - `rotator_probe_latency_seconds` (histogram): probe latency
//! - `rotator_cycles_total` (counter): resolution cycles by outcome
//! - `rotator_blocklist_fail_open_total` (counter): authority errors
//!   treated as "not blocked"
//! - `rotator_endpoint_available` (gauge): 1 after a resolved cycle,
//!   0 after an exhausted or config-error cycle

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resolver::candidate::ProbeOutcome;
use crate::resolver::state::ResolutionOutcome;

/// Install the Prometheus exporter with its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(error) => tracing::error!(%error, "failed to install metrics exporter"),
    }
}

pub fn record_probe(outcome: ProbeOutcome, latency: Duration) {
    metrics::counter!("rotator_probes_total", "outcome" => outcome.as_str()).increment(1);
    metrics::histogram!("rotator_probe_latency_seconds").record(latency.as_secs_f64());
}

pub fn record_cycle(outcome: &ResolutionOutcome) {
    metrics::counter!("rotator_cycles_total", "outcome" => outcome.as_str()).increment(1);
    let available = matches!(outcome, ResolutionOutcome::Resolved(_));
    metrics::gauge!("rotator_endpoint_available").set(if available { 1.0 } else { 0.0 });
}

pub fn record_blocklist_fail_open() {
    metrics::counter!("rotator_blocklist_fail_open_total").increment(1);
}
