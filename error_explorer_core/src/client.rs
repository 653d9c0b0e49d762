/**
 * The reporter — central orchestrator of the capture-enrich-deliver
 * pipeline.
 *
 * Lifecycle:
 * 1. Host wiring builds a `ReporterConfig`, then a `Reporter`, and stores
 *    it in the global `OnceLock` via `configure()` — once, at startup.
 * 2. Application code calls the crate-root `report_*` / `log_*` functions,
 *    which read the global reporter and run the pipeline synchronously on
 *    the calling thread.
 *
 * The reporter is intentionally **not** `Clone` — there is exactly one
 * configured instance per process. After `configure()` it is only ever
 * read, so no locking is needed on the report path. Re-configuring later
 * is treated as a startup bug: the call is ignored with a warning.
 */
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};

use crate::breadcrumbs::BreadcrumbTrail;
use crate::config::ReporterConfig;
use crate::events::ErrorEvent;
use crate::protocol::levels::LogLevel;
use crate::protocol::payload::PayloadBuilder;
use crate::request::RequestInfo;
use crate::transport::{DeliveryClient, Transport};

// ---------------------------------------------------------------------------
// Global singleton
// ---------------------------------------------------------------------------

/**
 * Process-wide slot holding the configured `Reporter`.
 *
 * Empty is a valid, silently degraded state: every public entry point
 * checks it and no-ops (with a diagnostic log line) when unset.
 */
static GLOBAL_REPORTER: OnceLock<Reporter> = OnceLock::new();

/// Returns the configured reporter, or `None` before `configure()`.
pub(crate) fn get_reporter() -> Option<&'static Reporter> {
    GLOBAL_REPORTER.get()
}

/**
 * Installs the process-wide reporter. Call once during startup.
 *
 * A second call is ignored — the first configuration wins and a warning
 * is logged, since late re-configuration is a wiring bug.
 */
pub fn configure(reporter: Reporter) {
    if GLOBAL_REPORTER.set(reporter).is_err() {
        tracing::warn!("error reporter is already configured; ignoring reconfiguration");
    }
}

/// `true` once `configure()` has installed a reporter.
pub fn is_configured() -> bool {
    GLOBAL_REPORTER.get().is_some()
}

// ---------------------------------------------------------------------------
// Reporter
// ---------------------------------------------------------------------------

/**
 * Owns the configured pipeline: config, payload builder, delivery client
 * and the breadcrumb trail.
 *
 * Usable standalone (dependency-injected) or through the global facade.
 */
pub struct Reporter {
    config: ReporterConfig,
    builder: PayloadBuilder,
    delivery: DeliveryClient,
    trail: Arc<BreadcrumbTrail>,
}

impl Reporter {
    /// Builds a reporter with the production HTTP transport.
    pub fn new(config: ReporterConfig) -> Self {
        let delivery = DeliveryClient::new(&config);
        Self::assemble(config, delivery)
    }

    /// Builds a reporter around a caller-supplied transport.
    pub fn with_transport(config: ReporterConfig, transport: Box<dyn Transport>) -> Self {
        let delivery = DeliveryClient::with_transport(&config, transport);
        Self::assemble(config, delivery)
    }

    fn assemble(config: ReporterConfig, delivery: DeliveryClient) -> Self {
        Self {
            builder: PayloadBuilder::new(config.project_name()),
            delivery,
            config,
            trail: Arc::new(BreadcrumbTrail::new()),
        }
    }

    /**
     * A handle to this reporter's breadcrumb trail.
     *
     * Instrumentation code can hold the handle and add breadcrumbs
     * directly, independent of the reporting path.
     */
    pub fn trail(&self) -> Arc<BreadcrumbTrail> {
        Arc::clone(&self.trail)
    }

    /**
     * Reports a captured error.
     *
     * Gate order: the `enabled` flag, then the ignore list. Only events
     * that pass both are fingerprinted, built and delivered. Delivery
     * failure is logged to the diagnostic side-channel and swallowed —
     * this function never fails from the caller's perspective.
     */
    pub fn report_error(
        &self,
        event: &ErrorEvent,
        environment: &str,
        http_status: Option<u16>,
        request: Option<&RequestInfo>,
    ) {
        if !self.config.is_enabled() || self.should_ignore(&event.type_name) {
            return;
        }

        let payload = self
            .builder
            .for_error(event, environment, http_status, request, &self.trail);

        if let Err(error) = self.delivery.send(&payload) {
            tracing::error!(
                %error,
                exception_class = %event.type_name,
                original_error = %event.message,
                "failed to report error to Error Explorer"
            );
        }
    }

    /**
     * Reports a custom message at the given severity.
     *
     * Skipped entirely when reporting is disabled or the level is below
     * the configured minimum. Like `report_error`, delivery failure is
     * logged and swallowed.
     */
    pub fn report_message(
        &self,
        message: &str,
        environment: &str,
        http_status: Option<u16>,
        request: Option<&RequestInfo>,
        level: LogLevel,
        context: Map<String, Value>,
    ) {
        if !self.config.is_enabled() {
            return;
        }

        if level.priority() < self.config.get_minimum_level().priority() {
            return;
        }

        let payload = self.builder.for_message(
            message,
            environment,
            http_status,
            request,
            level,
            context,
            &self.trail,
        );

        if let Err(error) = self.delivery.send(&payload) {
            tracing::error!(
                %error,
                original_message = %message,
                "failed to report message to Error Explorer"
            );
        }
    }

    /**
     * Ignore-list gate.
     *
     * Exact type-tag comparison. The original behaviour also matched
     * subtypes through runtime reflection; Rust has none, so exact
     * matching is the documented degraded mode.
     */
    fn should_ignore(&self, type_name: &str) -> bool {
        self.config
            .get_ignored_types()
            .iter()
            .any(|ignored| ignored == type_name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::protocol::payload::Payload;
    use crate::transport::TransportError;

    /// Records every delivered payload; optionally always fails.
    struct CapturingTransport {
        delivered: Mutex<Vec<Payload>>,
        fail: bool,
    }

    impl CapturingTransport {
        fn working() -> Arc<Self> {
            Arc::new(Self {
                delivered: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn broken() -> Arc<Self> {
            Arc::new(Self {
                delivered: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn count(&self) -> usize {
            self.delivered.lock().expect("not poisoned").len()
        }
    }

    impl Transport for CapturingTransport {
        fn post(
            &self,
            _url: &str,
            _headers: &[(&'static str, String)],
            payload: &Payload,
        ) -> Result<(), TransportError> {
            self.delivered
                .lock()
                .expect("not poisoned")
                .push(payload.clone());

            if self.fail {
                Err(TransportError::Http("always down".into()))
            } else {
                Ok(())
            }
        }
    }

    fn config() -> ReporterConfig {
        ReporterConfig::new("https://errors.example.com", "tok-1234567890", "demo-app")
            .expect("valid config")
    }

    fn reporter_with(config: ReporterConfig) -> (Reporter, Arc<CapturingTransport>) {
        let transport = CapturingTransport::working();
        let reporter = Reporter::with_transport(config, Box::new(Arc::clone(&transport)));
        (reporter, transport)
    }

    /// An error whose exact type tag is on the ignore list never reaches
    /// the transport.
    #[test]
    fn test_ignored_type_skips_delivery() {
        let config = config().ignored_types(vec!["Exception".into()]);
        let (reporter, transport) = reporter_with(config);

        reporter.report_error(&ErrorEvent::new("Exception", "boom"), "prod", None, None);
        assert_eq!(transport.count(), 0);

        reporter.report_error(&ErrorEvent::new("OtherError", "boom"), "prod", None, None);
        assert_eq!(transport.count(), 1);
    }

    #[test]
    fn test_disabled_reporter_delivers_nothing() {
        let (reporter, transport) = reporter_with(config().enabled(false));

        reporter.report_error(&ErrorEvent::new("E", "boom"), "prod", None, None);
        reporter.report_message("m", "prod", None, None, LogLevel::Emergency, Map::new());

        assert_eq!(transport.count(), 0);
    }

    /// Messages below the minimum level are gated before any building.
    #[test]
    fn test_minimum_level_gate() {
        let (reporter, transport) = reporter_with(config().minimum_level(LogLevel::Warning));

        reporter.report_message("quiet", "prod", None, None, LogLevel::Info, Map::new());
        assert_eq!(transport.count(), 0);

        reporter.report_message("loud", "prod", None, None, LogLevel::Warning, Map::new());
        assert_eq!(transport.count(), 1);
    }

    /// The minimum-level gate applies to messages, not errors.
    #[test]
    fn test_errors_bypass_minimum_level() {
        let (reporter, transport) = reporter_with(config().minimum_level(LogLevel::Emergency));

        reporter.report_error(&ErrorEvent::new("E", "boom"), "prod", None, None);

        assert_eq!(transport.count(), 1);
        assert_eq!(transport.delivered.lock().expect("not poisoned")[0].level, LogLevel::Error);
    }

    /**
     * A reporter with zero retries and a dead transport must swallow the
     * failure — the call site sees nothing.
     */
    #[test]
    fn test_delivery_failure_is_contained() {
        let config = config().max_retries(0).expect("in range");
        let transport = CapturingTransport::broken();
        let reporter = Reporter::with_transport(config, Box::new(Arc::clone(&transport)));

        reporter.report_error(&ErrorEvent::new("E", "boom"), "prod", None, None);

        assert_eq!(transport.count(), 1);
    }

    /// Breadcrumbs added through the trail handle ride along on payloads.
    #[test]
    fn test_trail_handle_feeds_payloads() {
        let (reporter, transport) = reporter_with(config());

        let trail = reporter.trail();
        trail.log_user_action("pressed sync", Map::new());

        reporter.report_error(&ErrorEvent::new("SyncError", "boom"), "prod", None, None);

        let delivered = transport.delivered.lock().expect("not poisoned");
        let crumbs = delivered[0].breadcrumbs.as_ref().expect("breadcrumbs present");
        assert_eq!(crumbs[0].message, "User action: pressed sync");
    }
}
