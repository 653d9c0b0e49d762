/*!
 * HTTP transport for delivering payloads to the webhook endpoint.
 *
 * Uses `ureq` — a pure-Rust blocking HTTP client with no async runtime.
 * The whole pipeline is synchronous by design, so blocking I/O on the
 * calling thread is exactly what the delivery contract asks for.
 *
 * The `Transport` trait is the seam between the retry logic and the
 * network: one POST, success or failure. Tests substitute it with a
 * scripted fake; retry and backoff live above it in `DeliveryClient`.
 */
use std::time::Duration;

use ureq::Agent;

use crate::protocol::payload::Payload;

/// Failure of a single delivery attempt.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(String),
}

/**
 * One HTTP POST of a JSON payload.
 *
 * Implementations must be usable from any thread; the reporting pipeline
 * runs on whichever thread called `report_*`.
 */
pub trait Transport: Send + Sync {
    /**
     * POSTs `payload` as JSON to `url` with the given extra headers.
     *
     * Returns `Ok(())` on any completed exchange — the response status is
     * not inspected, transport-level success is sufficient.
     */
    fn post(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        payload: &Payload,
    ) -> Result<(), TransportError>;
}

/// A shared transport delegates to its inner value, so one instance can be
/// handed to a `DeliveryClient` while the owner keeps a handle to it.
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn post(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        payload: &Payload,
    ) -> Result<(), TransportError> {
        (**self).post(url, headers, payload)
    }
}

/**
 * Production transport backed by a `ureq::Agent`.
 *
 * The agent applies the configured per-attempt timeout to the whole
 * request and treats non-2xx statuses as regular responses, not errors.
 */
pub struct HttpTransport {
    agent: Agent,
}

impl HttpTransport {
    /// Builds a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }
}

impl Transport for HttpTransport {
    fn post(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        payload: &Payload,
    ) -> Result<(), TransportError> {
        let mut request = self.agent.post(url);

        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        // send_json sets Content-Type: application/json itself.
        request
            .send_json(payload)
            .map(|_| ())
            .map_err(|e| TransportError::Http(e.to_string()))
    }
}
