/**
 * Boundary type describing the HTTP request an error occurred in.
 *
 * The SDK does not integrate with any particular web framework; host
 * wiring extracts these fields from whatever request type it has and the
 * payload builder sanitizes them before they go on the wire.
 */
use serde_json::{Map, Value};

/**
 * The request context handed to `report_error` / `report_message`.
 *
 * `headers` values may be strings or lists of strings — whichever shape
 * the host framework exposes is preserved through sanitization.
 */
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    /// Full request URL.
    pub url: String,

    /// HTTP method.
    pub method: String,

    /// Matched route name, when the router provides one.
    pub route: Option<String>,

    /// Client IP address.
    pub ip: Option<String>,

    /// Raw User-Agent header value.
    pub user_agent: Option<String>,

    /// Body parameters (form fields, JSON body), insertion-ordered.
    pub parameters: Map<String, Value>,

    /// Query string parameters, insertion-ordered.
    pub query: Map<String, Value>,

    /// Request headers; values are strings or lists of strings.
    pub headers: Map<String, Value>,
}

impl RequestInfo {
    /// Starts a request description with just the method and URL.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            ..Self::default()
        }
    }

    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}
