// Request logging middleware
use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::Instrument;

/// Logs method, path, status and latency of each inbound call.
///
/// The query string is left out: it carries caller data that is forwarded
/// upstream.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().simple().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = tracing::info_span!("request", id = %&request_id[..8]);

    async move {
        let start = Instant::now();
        tracing::info!("Request: {} {}", method, path);
        let response = next.run(request).await;
        tracing::info!(
            "Response: {} {} -> {} ({} ms)",
            method,
            path,
            response.status().as_u16(),
            start.elapsed().as_millis()
        );
        response
    }
    .instrument(span)
    .await
}
