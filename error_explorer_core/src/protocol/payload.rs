/**
 * Outbound payload assembly.
 *
 * `PayloadBuilder` turns a captured error or custom message into the exact
 * JSON record the Error Explorer backend expects, pulling in the optional
 * request context (sanitized), server stats, and the current breadcrumb
 * trail. One `Payload` is built per reported event and reused across all
 * delivery attempts of that event.
 *
 * Redaction happens here and only here: secrets must never survive into a
 * serialized payload.
 */
use serde::Serialize;
use serde_json::{Map, Value};

use crate::breadcrumbs::{Breadcrumb, BreadcrumbTrail};
use crate::events::{capture_stack_trace, ErrorEvent};
use crate::protocol::atom_timestamp;
use crate::protocol::constants::RUNTIME_VERSION;
use crate::protocol::fingerprint::Fingerprint;
use crate::protocol::levels::LogLevel;
use crate::request::RequestInfo;

// ---------------------------------------------------------------------------
// Redaction policy
// ---------------------------------------------------------------------------

/// Substrings that mark a parameter key as sensitive (case-insensitive).
const SENSITIVE_KEYS: [&str; 6] = ["password", "token", "secret", "key", "api_key", "authorization"];

/// Header names whose values are always redacted (case-insensitive, exact).
const SENSITIVE_HEADERS: [&str; 4] = ["authorization", "cookie", "x-api-key", "x-auth-token"];

/// Replacement written in place of a redacted value.
const REDACTED: &str = "[REDACTED]";

// ---------------------------------------------------------------------------
// Wire structures
// ---------------------------------------------------------------------------

/**
 * The JSON record POSTed to the webhook endpoint.
 *
 * Exception events carry `file`/`line` and no `context`; message events
 * set `exception_class` to `"CustomMessage"`, serialize `file`/`line` as
 * null and attach the caller's free-form `context` map.
 */
#[derive(Debug, Clone, Serialize)]
pub struct Payload {
    pub message: String,
    pub exception_class: String,
    pub stack_trace: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub project: String,
    pub environment: String,
    pub timestamp: String,
    pub fingerprint: String,
    pub level: LogLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestContext>,
    pub server: ServerContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadcrumbs: Option<Vec<Breadcrumb>>,
}

/// Sanitized view of the request an event occurred in.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub url: String,
    pub method: String,
    pub route: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub parameters: Map<String, Value>,
    pub query: Map<String, Value>,
    pub headers: Map<String, Value>,
}

/// Informational host stats attached to every payload; never redacted.
#[derive(Debug, Clone, Serialize)]
pub struct ServerContext {
    pub runtime_version: String,
    pub memory_usage: u64,
    pub memory_peak: u64,
    pub server_time: String,
}

// ---------------------------------------------------------------------------
// PayloadBuilder
// ---------------------------------------------------------------------------

/**
 * Assembles payloads for one project.
 *
 * Stateless apart from the project name; safe to share.
 */
pub struct PayloadBuilder {
    project_name: String,
}

impl PayloadBuilder {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
        }
    }

    /**
     * Builds the payload for a captured error.
     *
     * Severity is always `error`; the fingerprint is derived from the
     * (type, file, line) identity triple. The breadcrumb block is omitted
     * entirely when the trail is empty.
     */
    pub fn for_error(
        &self,
        event: &ErrorEvent,
        environment: &str,
        http_status: Option<u16>,
        request: Option<&RequestInfo>,
        trail: &BreadcrumbTrail,
    ) -> Payload {
        let fingerprint = Fingerprint::from_exception(&event.type_name, &event.file, event.line);

        Payload {
            message: event.message.clone(),
            exception_class: event.type_name.clone(),
            stack_trace: event.stack_trace.clone(),
            file: Some(event.file.clone()),
            line: Some(event.line),
            project: self.project_name.clone(),
            environment: environment.to_string(),
            timestamp: atom_timestamp(),
            fingerprint: fingerprint.to_string(),
            level: LogLevel::Error,
            context: None,
            http_status,
            request: request.map(Self::request_context),
            server: server_context(),
            breadcrumbs: trail_block(trail),
        }
    }

    /**
     * Builds the payload for a custom message.
     *
     * Same shape as the error variant, but the type tag is the literal
     * `"CustomMessage"`, `file`/`line` are null, the severity is the
     * caller's level and the free-form context map rides along. A stack
     * trace is still captured at the reporting site.
     */
    pub fn for_message(
        &self,
        message: &str,
        environment: &str,
        http_status: Option<u16>,
        request: Option<&RequestInfo>,
        level: LogLevel,
        context: Map<String, Value>,
        trail: &BreadcrumbTrail,
    ) -> Payload {
        let fingerprint = Fingerprint::from_message(message, level);

        Payload {
            message: message.to_string(),
            exception_class: "CustomMessage".to_string(),
            stack_trace: capture_stack_trace(),
            file: None,
            line: None,
            project: self.project_name.clone(),
            environment: environment.to_string(),
            timestamp: atom_timestamp(),
            fingerprint: fingerprint.to_string(),
            level,
            context: Some(context),
            http_status,
            request: request.map(Self::request_context),
            server: server_context(),
            breadcrumbs: trail_block(trail),
        }
    }

    /// Extracts and sanitizes the request block.
    fn request_context(request: &RequestInfo) -> RequestContext {
        RequestContext {
            url: request.url.clone(),
            method: request.method.clone(),
            route: request.route.clone(),
            ip: request.ip.clone(),
            user_agent: request.user_agent.clone(),
            parameters: sanitize_parameters(&request.parameters),
            query: sanitize_parameters(&request.query),
            headers: sanitize_headers(&request.headers),
        }
    }
}

/// Snapshot of the trail, or `None` when it is empty (the key is omitted).
fn trail_block(trail: &BreadcrumbTrail) -> Option<Vec<Breadcrumb>> {
    let breadcrumbs = trail.snapshot();
    if breadcrumbs.is_empty() {
        None
    } else {
        Some(breadcrumbs)
    }
}

// ---------------------------------------------------------------------------
// Sanitization
// ---------------------------------------------------------------------------

/**
 * Replaces the value of every sensitive parameter with `[REDACTED]`.
 *
 * A key is sensitive when its lowercase form *contains* any of the
 * `SENSITIVE_KEYS` substrings, so `user_api_key` and `X-Csrf-Token` are
 * both caught. Key order is preserved.
 */
pub fn sanitize_parameters(parameters: &Map<String, Value>) -> Map<String, Value> {
    parameters
        .iter()
        .map(|(key, value)| {
            let value = if is_sensitive_key(key) {
                Value::String(REDACTED.to_string())
            } else {
                value.clone()
            };
            (key.clone(), value)
        })
        .collect()
}

/**
 * Replaces the values of well-known sensitive headers with `[REDACTED]`.
 *
 * Matching is an exact, case-insensitive comparison against
 * `SENSITIVE_HEADERS`. A list-valued header stays a list (of one
 * `[REDACTED]` entry) so the shape survives.
 */
pub fn sanitize_headers(headers: &Map<String, Value>) -> Map<String, Value> {
    headers
        .iter()
        .map(|(key, value)| {
            let lowered = key.to_lowercase();
            let value = if SENSITIVE_HEADERS.contains(&lowered.as_str()) {
                match value {
                    Value::Array(_) => Value::Array(vec![Value::String(REDACTED.to_string())]),
                    _ => Value::String(REDACTED.to_string()),
                }
            } else {
                value.clone()
            };
            (key.clone(), value)
        })
        .collect()
}

fn is_sensitive_key(key: &str) -> bool {
    let lowered = key.to_lowercase();
    SENSITIVE_KEYS.iter().any(|needle| lowered.contains(needle))
}

// ---------------------------------------------------------------------------
// Server context
// ---------------------------------------------------------------------------

/// Collects host stats for the `server` block.
pub fn server_context() -> ServerContext {
    let (memory_usage, memory_peak) = process_memory();

    ServerContext {
        runtime_version: RUNTIME_VERSION.to_string(),
        memory_usage,
        memory_peak,
        server_time: atom_timestamp(),
    }
}

/**
 * Current and peak resident memory of this process, in bytes.
 *
 * Read from `/proc/self/status` (VmRSS / VmHWM) on Linux; reported as
 * zero on platforms without procfs. Informational only.
 */
fn process_memory() -> (u64, u64) {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            let mut usage = 0;
            let mut peak = 0;

            for line in status.lines() {
                if let Some(rest) = line.strip_prefix("VmRSS:") {
                    usage = parse_kb_line(rest);
                } else if let Some(rest) = line.strip_prefix("VmHWM:") {
                    peak = parse_kb_line(rest);
                }
            }

            return (usage, peak);
        }
    }

    (0, 0)
}

#[cfg(target_os = "linux")]
fn parse_kb_line(rest: &str) -> u64 {
    rest.trim()
        .trim_end_matches("kB")
        .trim()
        .parse::<u64>()
        .map(|kb| kb * 1024)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn builder() -> PayloadBuilder {
        PayloadBuilder::new("demo-project")
    }

    #[test]
    fn test_sensitive_parameter_is_redacted() {
        let mut params = Map::new();
        params.insert("user_password".into(), json!("hunter2"));
        params.insert("normal_param".into(), json!("value"));

        let sanitized = sanitize_parameters(&params);

        assert_eq!(sanitized["user_password"], json!(REDACTED));
        assert_eq!(sanitized["normal_param"], json!("value"));
    }

    /// Substring matching: `user_api_key` contains both "key" and "api_key".
    #[test]
    fn test_sensitive_key_matches_substrings() {
        let mut params = Map::new();
        params.insert("user_api_key".into(), json!("k-123"));
        params.insert("X-Csrf-Token".into(), json!("t-456"));
        params.insert("search".into(), json!("rust")); // contains no sensitive substring

        let sanitized = sanitize_parameters(&params);

        assert_eq!(sanitized["user_api_key"], json!(REDACTED));
        assert_eq!(sanitized["X-Csrf-Token"], json!(REDACTED));
        assert_eq!(sanitized["search"], json!("rust"));
    }

    #[test]
    fn test_header_redaction_is_case_insensitive_exact() {
        let mut headers = Map::new();
        headers.insert("AUTHORIZATION".into(), json!("Bearer abc"));
        headers.insert("Content-Type".into(), json!("application/json"));
        // Contains "authorization" as a substring but is not an exact match.
        headers.insert("X-Authorization-Hint".into(), json!("none"));

        let sanitized = sanitize_headers(&headers);

        assert_eq!(sanitized["AUTHORIZATION"], json!(REDACTED));
        assert_eq!(sanitized["Content-Type"], json!("application/json"));
        assert_eq!(sanitized["X-Authorization-Hint"], json!("none"));
    }

    #[test]
    fn test_list_valued_header_stays_a_list() {
        let mut headers = Map::new();
        headers.insert("Cookie".into(), json!(["a=1", "b=2"]));

        let sanitized = sanitize_headers(&headers);

        assert_eq!(sanitized["Cookie"], json!([REDACTED]));
    }

    #[test]
    fn test_error_payload_shape() {
        let trail = BreadcrumbTrail::new();
        let event = ErrorEvent::new("std::io::Error", "file not found");

        let payload = builder().for_error(&event, "staging", Some(500), None, &trail);

        assert_eq!(payload.exception_class, "std::io::Error");
        assert_eq!(payload.level, LogLevel::Error);
        assert_eq!(payload.project, "demo-project");
        assert_eq!(payload.environment, "staging");
        assert_eq!(payload.http_status, Some(500));
        assert_eq!(
            payload.fingerprint,
            Fingerprint::from_exception("std::io::Error", &event.file, event.line).to_string()
        );
        assert!(payload.file.is_some());
        assert!(payload.line.is_some());
        assert!(payload.context.is_none());
        assert!(payload.breadcrumbs.is_none());
    }

    /**
     * Message payloads keep the `file`/`line` keys but serialize them as
     * JSON null, and carry the caller's context map.
     */
    #[test]
    fn test_message_payload_shape() {
        let trail = BreadcrumbTrail::new();
        let mut context = Map::new();
        context.insert("job".into(), json!("sync"));

        let payload = builder().for_message(
            "sync fell behind",
            "prod",
            None,
            None,
            LogLevel::Warning,
            context,
            &trail,
        );

        assert_eq!(payload.exception_class, "CustomMessage");
        assert_eq!(payload.level, LogLevel::Warning);

        let value = serde_json::to_value(&payload).expect("serializes");
        assert_eq!(value["file"], Value::Null);
        assert_eq!(value["line"], Value::Null);
        assert_eq!(value["context"]["job"], json!("sync"));
        assert!(value.get("http_status").is_none());
        assert!(value.get("request").is_none());
        assert!(value.get("breadcrumbs").is_none());
    }

    #[test]
    fn test_breadcrumbs_attached_when_trail_non_empty() {
        let trail = BreadcrumbTrail::new();
        trail.log_user_action("clicked save", Map::new());

        let event = ErrorEvent::new("SaveError", "disk full");
        let payload = builder().for_error(&event, "prod", None, None, &trail);

        let breadcrumbs = payload.breadcrumbs.expect("trail was not empty");
        assert_eq!(breadcrumbs.len(), 1);
        assert_eq!(breadcrumbs[0].message, "User action: clicked save");
    }

    #[test]
    fn test_request_block_is_sanitized() {
        let trail = BreadcrumbTrail::new();
        let request = RequestInfo::new("POST", "https://app.example/login")
            .route("login")
            .ip("203.0.113.9")
            .user_agent("curl/8")
            .parameter("username", "alice")
            .parameter("password", "hunter2")
            .query_param("redirect", "/home")
            .header("Authorization", "Bearer abc")
            .header("Accept", "application/json");

        let event = ErrorEvent::new("AuthError", "bad credentials");
        let payload = builder().for_error(&event, "prod", Some(401), Some(&request), &trail);

        let ctx = payload.request.expect("request context present");
        assert_eq!(ctx.method, "POST");
        assert_eq!(ctx.route.as_deref(), Some("login"));
        assert_eq!(ctx.parameters["username"], json!("alice"));
        assert_eq!(ctx.parameters["password"], json!(REDACTED));
        assert_eq!(ctx.query["redirect"], json!("/home"));
        assert_eq!(ctx.headers["Authorization"], json!(REDACTED));
        assert_eq!(ctx.headers["Accept"], json!("application/json"));
    }

    #[test]
    fn test_server_context_is_populated() {
        let server = server_context();

        assert!(server.runtime_version.starts_with("rust-"));
        assert!(!server.server_time.is_empty());
    }
}
