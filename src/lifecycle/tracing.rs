//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`.
//! Module paths are hidden (`with_target(false)`); log lines carry structured fields such as
//! `kind`, `path`, `attempt` and `view` instead.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Requests, retries and notifications
//! RUST_LOG=info cargo run
//!
//! # Payloads and every poll tick
//! RUST_LOG=debug cargo run
//!
//! # Only the transport
//! RUST_LOG=admin_dashboard::framework=debug cargo run
//! ```
//!
//! ## What Gets Logged
//!
//! With `RUST_LOG=info` a cold start followed by a new order looks like:
//!
//! ```text
//! INFO Backend client ready base_url=http://localhost:5000/ timeout=30s attempts=5
//! INFO Waking up backend service probes=3
//! WARN Request timed out, backend might be asleep path="/health"
//! INFO Backend is awake probe=1 elapsed=24.1s
//! INFO Poller started view="dashboard" kind="order" interval=15s
//! WARN Retryable failure attempt=1 max_attempts=5 error=Backend responded with status 503
//! INFO Notification raised kind=NewRecord message=New order received! Total orders: 12
//! ```
//!
//! Retry attempts log at `warn`. Request payloads are only logged at `debug`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
