/*!
 * Error Explorer — Rust error tracking SDK.
 *
 * This is the main crate users should depend on. It re-exports the core
 * SDK API and wires up addons (panic hook) through a single `init` call.
 *
 * # Quick start
 *
 * ```ignore
 * fn main() -> Result<(), error_explorer::ConfigError> {
 *     let config = error_explorer::ReporterConfig::new(
 *         "https://errors.example.com",
 *         "your-project-token",
 *         "my-app",
 *     )?;
 *
 *     error_explorer::init(config);
 *
 *     error_explorer::log_user_action("started", Default::default());
 *     error_explorer::report_message("Application started");
 *
 *     // panics are automatically captured (catch_panics defaults to true)
 *     Ok(())
 * }
 * ```
 */

// ---------------------------------------------------------------------------
// Re-exports from error_explorer_core — the public surface area
// ---------------------------------------------------------------------------

pub use error_explorer_core::{
    add_breadcrumb, breadcrumb_count, breadcrumbs, capture_stack_trace, clear_breadcrumbs,
    configure, is_configured, log_http_request, log_navigation, log_performance, log_query,
    log_security, log_user_action, report_alert, report_critical, report_debug, report_emergency,
    report_error, report_error_with, report_info, report_message, report_message_with,
    report_warning, set_max_breadcrumbs, Breadcrumb, BreadcrumbCategory, BreadcrumbTrail,
    ConfigError, ErrorEvent, Fingerprint, InvalidCapacity, LogLevel, Payload, Reporter,
    ReporterConfig, RequestInfo, Transport, TransportError,
};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/**
 * Initialization options.
 *
 * Implements `From<ReporterConfig>` so `init(config)` works directly;
 * build the struct yourself to opt out of panic capture.
 */
pub struct InitOptions {
    /// Validated reporter configuration.
    pub config: ReporterConfig,

    /// Whether to install a panic hook that auto-captures panics.
    /// Defaults to `true`.
    pub catch_panics: bool,
}

impl From<ReporterConfig> for InitOptions {
    fn from(config: ReporterConfig) -> Self {
        Self {
            config,
            catch_panics: true,
        }
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

/**
 * Initializes the SDK: builds the `Reporter`, installs it in the global
 * facade slot, and (by default) registers the panic hook.
 *
 * Call once at startup, after loading and validating configuration.
 * A second call is ignored with a warning — the first wiring wins.
 */
pub fn init(options: impl Into<InitOptions>) {
    let opts = options.into();

    configure(Reporter::new(opts.config));

    // Panic hook is opt-out; most users want panics captured.
    if opts.catch_panics {
        error_explorer_panic::install();
    }
}
