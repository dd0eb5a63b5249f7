//! Per-request span, request ids and completion logging.

mod headers;
mod route;

use std::time::{Duration, Instant};

use salvo::{
    Request, async_trait,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Handler, Response},
};
use tracing::{Instrument as _, Span, error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use crate::config::observability::ObservabilityConfig;

use super::metrics;

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Middleware that wraps each request in an `http.request` span, tags it with
/// a request id, and records the outcome once the handler chain returns.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestLogging {
    slow_after: Duration,
    follow_traceparent: bool,
}

impl RequestLogging {
    pub(crate) fn new(config: &ObservabilityConfig) -> Self {
        Self {
            slow_after: Duration::from_millis(config.slow_request_threshold_ms),
            follow_traceparent: config.otel_enabled,
        }
    }

    fn request_span(&self, req: &Request, request_id: &str, route: &str) -> Span {
        let span = tracing::info_span!(
            parent: None,
            "http.request",
            otel.name = %format!("{} {route}", req.method()),
            otel.kind = "server",
            request_id = %request_id,
            method = %req.method(),
            path = %req.uri().path(),
            remote_addr = %req.remote_addr(),
            user_uuid = tracing::field::Empty,
            status = tracing::field::Empty,
            duration_ms = tracing::field::Empty
        );

        if self.follow_traceparent
            && let Some(parent) = headers::parent_context(req.headers())
            && let Err(source) = span.set_parent(parent)
        {
            warn!("ignoring unusable traceparent: {source}");
        }

        span
    }
}

#[async_trait]
impl Handler for RequestLogging {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        if req.uri().path() == "/metrics" {
            ctrl.call_next(req, depot, res).await;
            return;
        }

        let started = Instant::now();
        let request_id =
            headers::resolve_request_id(req.header::<String>(headers::REQUEST_ID_HEADER));

        headers::set_request_id(res, &request_id);

        let method = req.method().to_string();
        let route = route::templated(req.uri().path());
        let span = self.request_span(req, &request_id, &route);
        let _in_flight = metrics::InFlightRequestGuard::track();

        depot.insert(REQUEST_ID_DEPOT_KEY, request_id);

        ctrl.call_next(req, depot, res)
            .instrument(span.clone())
            .await;

        let elapsed = started.elapsed();
        let status = res.status_code.unwrap_or(StatusCode::OK).as_u16();
        let duration_ms = elapsed.as_millis();

        metrics::observe_request(&method, &route, status, elapsed.as_secs_f64());

        span.record("status", status);
        span.record("duration_ms", duration_ms);

        let _entered = span.enter();

        match status {
            500.. => error!(status, duration_ms, "request.failed"),
            400..500 => warn!(status, duration_ms, "request.rejected"),
            _ => info!(status, duration_ms, "request.completed"),
        }

        if elapsed > self.slow_after {
            warn!(%route, duration_ms, "request.slow");
        }
    }
}
