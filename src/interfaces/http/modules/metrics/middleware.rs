//! Per-request HTTP metrics
//!
//! `http_requests_total` is labelled by method, route template, status code
//! and status class; `http_request_duration_seconds` by method and route.
//! Route templates (`/breakdown/{order_id}`) keep order ids out of the labels.

use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use axum::http::StatusCode;

/// Route label for requests no route matched
const UNMATCHED: &str = "unmatched";

fn route_label(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED.to_string(), |route| route.as_str().to_string())
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let route = route_label(&request);
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => route.clone(),
        "status" => status.as_u16().to_string(),
        "class" => status_class(status)
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => route)
        .record(started.elapsed().as_secs_f64());

    response
}
