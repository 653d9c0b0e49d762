/*!
 * Error Explorer Core — the internal SDK engine.
 *
 * This crate implements the capture-enrich-deliver pipeline: breadcrumb
 * trail, fingerprinting, payload assembly with secret redaction, and
 * webhook delivery with bounded retries. End users should depend on the
 * `error_explorer` facade crate instead, which re-exports everything and
 * wires up addons (panic hook).
 *
 * # Module structure
 *
 * - `protocol/` — what we send: payload shapes, levels, fingerprints
 * - `transport/` — how we deliver: HTTP transport, retrying client
 * - `breadcrumbs` — the bounded process event trail
 * - `events` — capture-side error identity
 * - `config` — validated reporter settings
 * - `client` — reporter lifecycle, global slot, gating
 *
 * The pipeline is fully synchronous: reporting runs on the calling thread
 * and a failed delivery blocks it through the retry/backoff schedule, then
 * is logged and swallowed. Nothing here ever panics into, or raises out
 * of, the caller's error handling.
 */

pub mod breadcrumbs;
mod client;
pub mod config;
pub mod events;
pub mod protocol;
pub mod request;
pub mod transport;

use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use breadcrumbs::{Breadcrumb, BreadcrumbTrail, InvalidCapacity};
pub use client::{configure, is_configured, Reporter};
pub use config::{ConfigError, ReporterConfig};
pub use events::{capture_stack_trace, ErrorEvent};
pub use protocol::constants::{DEFAULT_ENVIRONMENT, USER_AGENT};
pub use protocol::fingerprint::Fingerprint;
pub use protocol::levels::{BreadcrumbCategory, LogLevel};
pub use protocol::payload::{Payload, PayloadBuilder};
pub use request::RequestInfo;
pub use transport::{DeliveryClient, HttpTransport, Transport, TransportError};

// ---------------------------------------------------------------------------
// Reporting entry points
// ---------------------------------------------------------------------------

/**
 * Reports an error with the default environment (`prod`) and no request
 * context.
 *
 * Silent no-op (with a diagnostic log line) if `configure()` has not been
 * called. Never panics, never returns an error.
 */
pub fn report_error(event: &ErrorEvent) {
    report_error_with(event, DEFAULT_ENVIRONMENT, None, None);
}

/// Reports an error with explicit environment, HTTP status and request
/// context.
pub fn report_error_with(
    event: &ErrorEvent,
    environment: &str,
    http_status: Option<u16>,
    request: Option<&RequestInfo>,
) {
    if let Some(reporter) = configured() {
        reporter.report_error(event, environment, http_status, request);
    }
}

/**
 * Reports a custom message at `error` severity with the default
 * environment (`prod`).
 */
pub fn report_message(message: &str) {
    report_message_with(message, DEFAULT_ENVIRONMENT, None, None, LogLevel::Error, Map::new());
}

/// Fully parameterized message report.
pub fn report_message_with(
    message: &str,
    environment: &str,
    http_status: Option<u16>,
    request: Option<&RequestInfo>,
    level: LogLevel,
    context: Map<String, Value>,
) {
    if let Some(reporter) = configured() {
        reporter.report_message(message, environment, http_status, request, level, context);
    }
}

/// Reports a `debug` message with a context map.
pub fn report_debug(message: &str, context: Map<String, Value>) {
    report_at_level(message, LogLevel::Debug, context);
}

/// Reports an `info` message with a context map.
pub fn report_info(message: &str, context: Map<String, Value>) {
    report_at_level(message, LogLevel::Info, context);
}

/// Reports a `warning` message with a context map.
pub fn report_warning(message: &str, context: Map<String, Value>) {
    report_at_level(message, LogLevel::Warning, context);
}

/// Reports a `critical` message with a context map.
pub fn report_critical(message: &str, context: Map<String, Value>) {
    report_at_level(message, LogLevel::Critical, context);
}

/// Reports an `alert` message with a context map.
pub fn report_alert(message: &str, context: Map<String, Value>) {
    report_at_level(message, LogLevel::Alert, context);
}

/// Reports an `emergency` message with a context map.
pub fn report_emergency(message: &str, context: Map<String, Value>) {
    report_at_level(message, LogLevel::Emergency, context);
}

fn report_at_level(message: &str, level: LogLevel, context: Map<String, Value>) {
    report_message_with(message, DEFAULT_ENVIRONMENT, None, None, level, context);
}

// ---------------------------------------------------------------------------
// Breadcrumb entry points
// ---------------------------------------------------------------------------

/// Adds a breadcrumb to the configured reporter's trail.
pub fn add_breadcrumb(
    message: &str,
    category: BreadcrumbCategory,
    level: LogLevel,
    data: Map<String, Value>,
) {
    if let Some(reporter) = trail_target() {
        reporter.trail().add(message, category, level, data);
    }
}

/// Records a navigation breadcrumb.
pub fn log_navigation(from: &str, to: &str, data: Map<String, Value>) {
    if let Some(reporter) = trail_target() {
        reporter.trail().log_navigation(from, to, data);
    }
}

/// Records a user-action breadcrumb.
pub fn log_user_action(action: &str, data: Map<String, Value>) {
    if let Some(reporter) = trail_target() {
        reporter.trail().log_user_action(action, data);
    }
}

/// Records an HTTP request breadcrumb (severity derived from the status).
pub fn log_http_request(method: &str, url: &str, status_code: Option<u16>, data: Map<String, Value>) {
    if let Some(reporter) = trail_target() {
        reporter.trail().log_http_request(method, url, status_code, data);
    }
}

/// Records a database query breadcrumb (severity derived from duration).
pub fn log_query(query: &str, duration_ms: Option<f64>, data: Map<String, Value>) {
    if let Some(reporter) = trail_target() {
        reporter.trail().log_query(query, duration_ms, data);
    }
}

/// Records a performance metric breadcrumb.
pub fn log_performance(metric: &str, value: f64, unit: &str) {
    if let Some(reporter) = trail_target() {
        reporter.trail().log_performance(metric, value, unit);
    }
}

/// Records a security event breadcrumb.
pub fn log_security(event: &str, level: LogLevel, data: Map<String, Value>) {
    if let Some(reporter) = trail_target() {
        reporter.trail().log_security(event, level, data);
    }
}

/// Empties the configured reporter's breadcrumb trail.
pub fn clear_breadcrumbs() {
    if let Some(reporter) = trail_target() {
        reporter.trail().clear();
    }
}

/**
 * Updates the breadcrumb trail capacity.
 *
 * The [10, 100] range is enforced even before configuration, so a bad
 * value is always rejected rather than silently deferred.
 */
pub fn set_max_breadcrumbs(max: usize) -> Result<(), InvalidCapacity> {
    match trail_target() {
        Some(reporter) => reporter.trail().set_capacity(max),
        None => {
            if !(breadcrumbs::MIN_CAPACITY..=breadcrumbs::MAX_CAPACITY).contains(&max) {
                return Err(InvalidCapacity(max));
            }
            Ok(())
        }
    }
}

/// Number of breadcrumbs currently in the configured trail (0 if unset).
pub fn breadcrumb_count() -> usize {
    client::get_reporter().map_or(0, |reporter| reporter.trail().len())
}

/// Ordered snapshot of the configured trail (empty if unset).
pub fn breadcrumbs() -> Vec<Breadcrumb> {
    client::get_reporter().map_or_else(Vec::new, |reporter| reporter.trail().snapshot())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// The configured reporter, logging a diagnostic when reporting is called
/// too early.
fn configured() -> Option<&'static Reporter> {
    let reporter = client::get_reporter();
    if reporter.is_none() {
        tracing::warn!("error reporter not configured; event dropped");
    }
    reporter
}

/// Same as `configured()`, but breadcrumb instrumentation is expected to
/// fire before startup finishes, so the diagnostic is quieter.
fn trail_target() -> Option<&'static Reporter> {
    let reporter = client::get_reporter();
    if reporter.is_none() {
        tracing::debug!("error reporter not configured; breadcrumb dropped");
    }
    reporter
}
