//! Trace context propagation over gRPC metadata (W3C `traceparent`).

use opentelemetry::trace::TraceContextExt;
use tonic::{Request, Status};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACEPARENT_KEY: &str = "traceparent";
pub const TRACESTATE_KEY: &str = "tracestate";
pub const REQUEST_ID_KEY: &str = "x-request-id";

/// Server-side interceptor: logs the inbound trace context and records the
/// request id on the current span.
#[allow(clippy::result_large_err)]
pub fn trace_context_interceptor(request: Request<()>) -> Result<Request<()>, Status> {
    if let Some(traceparent) = request.metadata().get(TRACEPARENT_KEY)
        && let Ok(traceparent) = traceparent.to_str()
    {
        tracing::debug!(traceparent = %traceparent, "Received trace context");
    }

    if let Some(request_id) = extract_request_id(&request) {
        Span::current().record("request_id", request_id.as_str());
    }

    Ok(request)
}

/// Copy the current span's context into outgoing request metadata.
pub fn inject_trace_context<T>(request: &mut Request<T>) {
    let context = Span::current().context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return;
    }

    // version-trace_id-span_id-trace_flags
    let traceparent = format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    );
    if let Ok(value) = traceparent.parse() {
        request.metadata_mut().insert(TRACEPARENT_KEY, value);
    }

    let tracestate = span_context.trace_state().header();
    if !tracestate.is_empty()
        && let Ok(value) = tracestate.parse()
    {
        request.metadata_mut().insert(TRACESTATE_KEY, value);
    }
}

pub fn with_request_id<T>(mut request: Request<T>, request_id: &str) -> Request<T> {
    if let Ok(value) = request_id.parse() {
        request.metadata_mut().insert(REQUEST_ID_KEY, value);
    }
    request
}

pub fn extract_request_id<T>(request: &Request<T>) -> Option<String> {
    request
        .metadata()
        .get(REQUEST_ID_KEY)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
