/*!
 * End-to-end test of the global facade: unconfigured behaviour, one-time
 * configuration, and the shape of payloads delivered through it.
 *
 * Everything lives in a single #[test] because the facade is a set-once
 * process-wide slot — ordering matters.
 */

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use error_explorer_core::{
    add_breadcrumb, breadcrumb_count, configure, is_configured, report_error, report_message,
    set_max_breadcrumbs, BreadcrumbCategory, ErrorEvent, LogLevel, Payload, Reporter,
    ReporterConfig, Transport, TransportError,
};

/// Records every payload it is asked to deliver; never fails.
#[derive(Default)]
struct RecordingTransport {
    delivered: Mutex<Vec<Payload>>,
}

impl RecordingTransport {
    fn take(&self) -> Vec<Payload> {
        let mut guard = self.delivered.lock().expect("not poisoned");
        std::mem::take(&mut *guard)
    }
}

impl Transport for RecordingTransport {
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
        Ok(())
    }
}

#[test]
fn facade_lifecycle() {
    // --- Before configuration: everything is a safe no-op. -----------------
    assert!(!is_configured());

    report_message("dropped before configure");
    report_error(&ErrorEvent::new("EarlyError", "dropped"));
    add_breadcrumb("dropped", BreadcrumbCategory::Custom, LogLevel::Info, Map::new());
    assert_eq!(breadcrumb_count(), 0);

    // Capacity range is enforced even in the unconfigured state.
    assert!(set_max_breadcrumbs(5).is_err());
    assert!(set_max_breadcrumbs(20).is_ok());

    // --- Configure once. ---------------------------------------------------
    let transport = Arc::new(RecordingTransport::default());
    let config = ReporterConfig::new("https://errors.example.com", "tok-1234567890", "demo-app")
        .expect("valid config");
    configure(Reporter::with_transport(config, Box::new(Arc::clone(&transport))));
    assert!(is_configured());

    // --- Default message report: level=error, environment=prod, no request.
    report_message("Custom message");

    let delivered = transport.take();
    assert_eq!(delivered.len(), 1);

    let payload = &delivered[0];
    assert_eq!(payload.exception_class, "CustomMessage");
    assert_eq!(payload.level, LogLevel::Error);
    assert_eq!(payload.environment, "prod");

    let json = serde_json::to_value(payload).expect("serializes");
    assert!(json.get("http_status").is_none());
    assert!(json.get("request").is_none());
    assert_eq!(json["file"], Value::Null);
    assert_eq!(json["line"], Value::Null);

    // --- Breadcrumbs recorded through the facade ride on error payloads. ---
    add_breadcrumb("cache warmed", BreadcrumbCategory::System, LogLevel::Info, Map::new());
    assert_eq!(breadcrumb_count(), 1);

    report_error(&ErrorEvent::new("SyncError", "boom"));

    let delivered = transport.take();
    assert_eq!(delivered.len(), 1);

    let crumbs = delivered[0].breadcrumbs.as_ref().expect("breadcrumbs attached");
    assert_eq!(crumbs.len(), 1);
    assert_eq!(crumbs[0].message, "cache warmed");
    assert_eq!(delivered[0].exception_class, "SyncError");
    assert!(delivered[0].file.as_deref().expect("file attributed").ends_with("facade.rs"));

    // --- Re-configuration is ignored; the first reporter keeps serving. ----
    let second_config =
        ReporterConfig::new("https://other.example.com", "tok-0987654321", "other-app")
            .expect("valid config");
    configure(Reporter::new(second_config));

    report_message("still the first reporter");
    assert_eq!(transport.take().len(), 1);
}
