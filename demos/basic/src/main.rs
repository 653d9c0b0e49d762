/*!
 * Minimal end-to-end usage of the Error Explorer SDK.
 *
 * Point `WEBHOOK_URL` and `PROJECT_TOKEN` at a real collector (or a local
 * request bin) to see the payloads arrive.
 */

use serde_json::Map;

use error_explorer::{ErrorEvent, LogLevel, ReporterConfig, RequestInfo};

fn main() -> Result<(), error_explorer::ConfigError> {
    // SDK diagnostics (delivery failures, dropped events) go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "error_explorer_core=debug".into()),
        )
        .init();

    let config = ReporterConfig::new(
        "https://errors.example.com",
        "demo-token-1234567890",
        "basic-demo",
    )?
    .minimum_level(LogLevel::Info)
    .timeout_secs(5)?
    .max_retries(2)?;

    error_explorer::init(config);

    // Instrumentation breadcrumbs — these ride along on the next report.
    error_explorer::log_navigation("/", "/checkout", Map::new());
    error_explorer::log_user_action("pressed pay", Map::new());
    error_explorer::log_http_request("POST", "https://pay.example/api/charge", Some(502), Map::new());
    error_explorer::log_query("SELECT * FROM orders WHERE id = ?", Some(1250.0), Map::new());

    // A custom message with context.
    let mut context = Map::new();
    context.insert("order_id".into(), serde_json::json!(4242));
    error_explorer::report_warning("Charge retried after gateway error", context);

    // An error with full request context.
    let request = RequestInfo::new("POST", "https://shop.example/checkout")
        .route("checkout")
        .ip("203.0.113.7")
        .user_agent("demo/1.0")
        .parameter("card_number", "4111-1111-1111-1111")
        .parameter("password", "hunter2"); // redacted before delivery

    let event = ErrorEvent::new("ChargeError", "payment gateway returned 502");
    error_explorer::report_error_with(&event, "demo", Some(502), Some(&request));

    // Panics are captured too (and then abort the process as usual).
    // panic!("uncomment to try the panic hook");

    Ok(())
}
