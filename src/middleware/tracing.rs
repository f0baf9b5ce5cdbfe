use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Wraps every request in a span carrying a request id, and logs the status
/// and latency once the response is ready. With no tracing subscriber
/// installed the events are forwarded to `log`.
pub async fn trace_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let span = tracing::info_span!(
        "request",
        method = %method,
        uri = %uri,
        request_id = %request_id,
    );

    async move {
        let started = Instant::now();
        let response = next.run(request).await;
        tracing::info!(
            "{method} {uri} -> {} in {:?} [{request_id}]",
            response.status().as_u16(),
            started.elapsed()
        );
        response
    }
    .instrument(span)
    .await
}
