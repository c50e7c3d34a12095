//! Request logging middleware.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{info, warn};
use std::time::Instant;

/// Logs method, path, status and latency for every request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let http_status = response.status();
    let duration_ms = started_at.elapsed().as_millis();
    if http_status.is_server_error() {
        warn!(
            "event=http_request module=api status=error method={} path={} http_status={} duration_ms={}",
            method,
            path,
            http_status.as_u16(),
            duration_ms
        );
    } else {
        info!(
            "event=http_request module=api status=ok method={} path={} http_status={} duration_ms={}",
            method,
            path,
            http_status.as_u16(),
            duration_ms
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::log_requests;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/ok", get(|| async { "fine" }))
            .route(
                "/boom",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "broken") }),
            )
            .layer(from_fn(log_requests))
    }

    async fn call(uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn passes_successful_responses_through_unchanged() {
        assert_eq!(call("/ok").await, (StatusCode::OK, "fine".to_string()));
    }

    #[tokio::test]
    async fn passes_server_errors_and_unmatched_routes_through_unchanged() {
        assert_eq!(
            call("/boom").await,
            (StatusCode::INTERNAL_SERVER_ERROR, "broken".to_string())
        );
        assert_eq!(call("/missing").await.0, StatusCode::NOT_FOUND);
    }
}
