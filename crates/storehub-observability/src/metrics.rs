use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::{Duration, Instant};

const REQUEST_DURATION: &str = "http_request_duration_seconds";

/// Installs the Prometheus recorder and spawns its upkeep task.
///
/// Until this is called every counter below is a no-op, which is what tests
/// rely on.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION.to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(handle)
}

/// Counts requests and records latency per matched route.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status)
        .increment(1);
    histogram!(REQUEST_DURATION, "method" => method, "path" => path).record(latency);

    response
}

pub fn track_login_success(role: &str) {
    counter!("auth_logins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

/// `reason` is one of `invalid_credentials`, `inactive` or `validation`.
pub fn track_login_failure(reason: &'static str) {
    counter!("auth_logins_total", "reason" => reason, "status" => "failure").increment(1);
}

pub fn track_registration() {
    counter!("auth_registrations_total").increment(1);
}

pub fn track_authorization_denied(guard: &'static str) {
    counter!("authorization_denied_total", "guard" => guard).increment(1);
}
