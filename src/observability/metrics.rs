//! Metrics recording.
//!
//! # Metrics
//! - `sni_proxy_discovery_polls_total` (counter): polls by outcome
//! - `sni_proxy_discovery_services` (gauge): routable services in the snapshot
//! - `sni_proxy_route_changes_total` (counter): routes added / removed
//! - `sni_proxy_locate_total` (counter): lookups by resolution
//!
//! # Design Decisions
//! - Recording only; exporting is left to the embedding process
//! - Label values are static strings to bound cardinality

/// Record the outcome of one discovery poll ("success" or "failure").
pub fn record_poll(outcome: &'static str) {
    ::metrics::counter!("sni_proxy_discovery_polls_total", "outcome" => outcome).increment(1);
}

/// Record the size of the newly published snapshot.
pub fn record_service_count(count: usize) {
    ::metrics::gauge!("sni_proxy_discovery_services").set(count as f64);
}

/// Record the routes added and removed by one published snapshot.
pub fn record_route_changes(added: usize, removed: usize) {
    if added > 0 {
        ::metrics::counter!("sni_proxy_route_changes_total", "change" => "added")
            .increment(added as u64);
    }
    if removed > 0 {
        ::metrics::counter!("sni_proxy_route_changes_total", "change" => "removed")
            .increment(removed as u64);
    }
}

/// Record one lookup, labelled with `Resolution::kind`.
pub fn record_locate(result: &'static str) {
    ::metrics::counter!("sni_proxy_locate_total", "result" => result).increment(1);
}
