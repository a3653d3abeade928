/// Prometheus metrics for asset-service
use actix_web::{HttpResponse, Responder};
use prometheus::{Encoder, HistogramVec, IntCounterVec, TextEncoder};

use crate::models::UploadKind;

lazy_static::lazy_static! {
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    ).unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = prometheus::register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latency",
        &["method", "path", "status"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 120.0]
    ).unwrap();

    pub static ref ASSET_UPLOADS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "asset_uploads_total",
        "Asset uploads by kind and outcome",
        &["kind", "outcome"]
    ).unwrap();

    pub static ref ASSET_UPLOAD_BYTES: HistogramVec = prometheus::register_histogram_vec!(
        "asset_upload_bytes",
        "Size of successfully stored assets",
        &["kind"],
        prometheus::exponential_buckets(1024.0, 4.0, 11).unwrap()
    ).unwrap();
}

/// Upload result label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Success,
    Rejected,
    Failed,
}

impl UploadOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// Count one upload attempt; `bytes` is only observed for successes
pub fn record_upload(kind: UploadKind, outcome: UploadOutcome, bytes: Option<u64>) {
    ASSET_UPLOADS_TOTAL
        .with_label_values(&[kind.as_str(), outcome.as_str()])
        .inc();

    if let (UploadOutcome::Success, Some(bytes)) = (outcome, bytes) {
        ASSET_UPLOAD_BYTES
            .with_label_values(&[kind.as_str()])
            .observe(bytes as f64);
    }
}

/// GET /metrics
pub async fn metrics_handler() -> impl Responder {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!(error = %e, "failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
