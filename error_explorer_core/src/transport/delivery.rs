/**
 * Retrying delivery of a payload to the webhook endpoint.
 *
 * `DeliveryClient` owns the endpoint URL and the retry policy. Delivery is
 * fully synchronous: attempts, backoff sleeps and all run on the calling
 * thread, bounded by `timeout × (max_retries + 1)` plus the backoff sum.
 *
 * The client reports the terminal outcome to its caller; swallowing and
 * logging that failure is the `Reporter`'s job, so the pipeline stays
 * fail-safe from the application's point of view.
 */
use std::thread;
use std::time::Duration;

use crate::config::ReporterConfig;
use crate::protocol::constants::{USER_AGENT, WEBHOOK_PATH};
use crate::protocol::payload::Payload;
use crate::transport::http::{HttpTransport, Transport, TransportError};

/// Base delay of the linear backoff: attempt n waits n × 100 ms.
const BACKOFF_STEP: Duration = Duration::from_millis(100);

/**
 * Sends payloads with bounded retries and linear backoff.
 */
pub struct DeliveryClient {
    transport: Box<dyn Transport>,
    endpoint: String,
    max_retries: u32,
}

impl DeliveryClient {
    /// Production client: `ureq` transport with the configured timeout.
    pub fn new(config: &ReporterConfig) -> Self {
        Self::with_transport(config, Box::new(HttpTransport::new(config.timeout())))
    }

    /// Client with a caller-supplied transport (tests, custom stacks).
    pub fn with_transport(config: &ReporterConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            endpoint: webhook_endpoint(config.webhook_base_url(), config.project_token()),
            max_retries: config.get_max_retries(),
        }
    }

    /// The full webhook URL this client POSTs to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /**
     * Delivers one payload.
     *
     * Performs up to `max_retries + 1` attempts. After a failed attempt
     * the calling thread sleeps `100 ms × attempt_number` before the next
     * one. Every attempt carries `X-Attempt` / `X-Max-Attempts` headers so
     * the receiving end can observe retry behaviour.
     *
     * Returns the last attempt's error when all attempts fail.
     */
    pub fn send(&self, payload: &Payload) -> Result<(), TransportError> {
        let max_attempts = self.max_retries + 1;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            let headers = [
                ("User-Agent", USER_AGENT.to_string()),
                ("X-Attempt", attempt.to_string()),
                ("X-Max-Attempts", max_attempts.to_string()),
            ];

            match self.transport.post(&self.endpoint, &headers, payload) {
                Ok(()) => return Ok(()),
                Err(error) => {
                    tracing::debug!(attempt, max_attempts, %error, "webhook attempt failed");
                    last_error = Some(error);

                    if attempt < max_attempts {
                        thread::sleep(BACKOFF_STEP * attempt);
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| TransportError::Http("webhook failed without error".into())))
    }
}

/// Joins the base URL (trailing slash stripped) with the webhook path and
/// the project token.
fn webhook_endpoint(base_url: &str, token: &str) -> String {
    format!("{}{WEBHOOK_PATH}{token}", base_url.trim_end_matches('/'))
}
