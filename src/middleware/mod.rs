pub mod auth;
pub mod request_metrics;
pub mod security_headers;

pub use auth::RequireRole;
pub use request_metrics::RequestMetrics;
pub use security_headers::SecurityHeaders;
