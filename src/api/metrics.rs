use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static CLIENT_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static SERVER_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn record_request() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// `None` means the service itself failed before producing a response.
pub fn record_response(status: Option<StatusCode>) {
    match status {
        Some(s) if s.is_client_error() => {
            CLIENT_ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        Some(s) if !s.is_server_error() => {}
        _ => {
            SERVER_ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MetricsSnapshot {
    pub http_requests_total: u64,
    pub http_client_errors_total: u64,
    pub http_server_errors_total: u64,
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        http_requests_total: REQUEST_COUNT.load(Ordering::Relaxed),
        http_client_errors_total: CLIENT_ERROR_COUNT.load(Ordering::Relaxed),
        http_server_errors_total: SERVER_ERROR_COUNT.load(Ordering::Relaxed),
    }
}

fn render(m: &MetricsSnapshot) -> String {
    format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_client_errors_total Responses with a 4xx status\n\
         # TYPE http_client_errors_total counter\n\
         http_client_errors_total {}\n\
         \n\
         # HELP http_server_errors_total Responses with a 5xx status or failed services\n\
         # TYPE http_server_errors_total counter\n\
         http_server_errors_total {}\n",
        m.http_requests_total, m.http_client_errors_total, m.http_server_errors_total
    )
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Request counters in Prometheus text format")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(render(&snapshot()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_move() {
        let before = snapshot();
        record_request();
        record_response(Some(StatusCode::NOT_FOUND));
        record_response(Some(StatusCode::OK));
        record_response(None);
        let after = snapshot();

        // other tests share the statics, so only check for growth
        assert!(after.http_requests_total > before.http_requests_total);
        assert!(after.http_client_errors_total > before.http_client_errors_total);
        assert!(after.http_server_errors_total > before.http_server_errors_total);
    }

    #[test]
    fn test_render_format() {
        let text = render(&MetricsSnapshot {
            http_requests_total: 7,
            http_client_errors_total: 2,
            http_server_errors_total: 1,
        });
        assert!(text.contains("http_requests_total 7\n"));
        assert!(text.contains("http_client_errors_total 2\n"));
        assert!(text.contains("# TYPE http_server_errors_total counter"));
    }
}
