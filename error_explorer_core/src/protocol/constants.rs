/**
 * SDK-wide constants.
 *
 * These values identify the SDK to the Error Explorer backend and pin
 * down the webhook URL layout.
 */

/// User-Agent header sent with every delivery attempt.
/// Derived at compile time from the `error_explorer_core` package version.
pub const USER_AGENT: &str = concat!("error-explorer-rust/", env!("CARGO_PKG_VERSION"));

/// Path appended to the webhook base URL; the project token follows it.
pub const WEBHOOK_PATH: &str = "/webhook/error/";

/// Environment attached to events when the caller does not name one.
pub const DEFAULT_ENVIRONMENT: &str = "prod";

/// Runtime version string reported in the server context block.
/// The minimum supported toolchain, taken from `rust-version` in Cargo.toml.
pub const RUNTIME_VERSION: &str = concat!("rust-", env!("CARGO_PKG_RUST_VERSION"));
