use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static CLAIMS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("claims_created_total", "Total claims created")
        .expect("register claims_created_total")
});

pub static CLAIM_STATUS_UPDATES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("claims_status_updates_total", "Total successful claim status updates")
        .expect("register claims_status_updates_total")
});

pub static CLAIM_LIST_REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("claims_list_requests_total", "Total claim listing requests served")
        .expect("register claims_list_requests_total")
});

pub static CLAIM_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "claims_request_errors_total",
        "Claim requests that failed, by error kind",
        &["kind"]
    )
    .expect("register claims_request_errors_total")
});

pub fn record_error(kind: &str) {
    CLAIM_ERRORS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

/// Register every counter up front so `/metrics` lists them before first use.
pub fn init() {
    Lazy::force(&CLAIMS_CREATED_TOTAL);
    Lazy::force(&CLAIM_STATUS_UPDATES_TOTAL);
    Lazy::force(&CLAIM_LIST_REQUESTS_TOTAL);
    Lazy::force(&CLAIM_ERRORS_TOTAL);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposition_lists_claim_counters() {
        init();
        CLAIMS_CREATED_TOTAL.inc();
        record_error("not_found");
        let (status, body) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("claims_created_total"));
        assert!(body.contains("claims_request_errors_total{kind=\"not_found\"}"));
    }
}
