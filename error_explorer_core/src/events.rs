/**
 * Capture-side error identity.
 *
 * Rust has no exception reflection, so every reportable error carries an
 * explicit type tag (`type_name`) plus the source location and a formatted
 * stack trace. `ErrorEvent::new` uses `#[track_caller]` to attribute the
 * event to the call site, which keeps fingerprints stable per crash site.
 */
use std::error::Error;
use std::panic::Location;

/**
 * One reportable error occurrence.
 *
 * Transient — constructed at the capture boundary and consumed immediately
 * by the payload builder.
 */
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    /// Explicit type tag, e.g. `"std::io::Error"` or `"panic"`.
    /// Matched (exactly) against the configured ignore list.
    pub type_name: String,

    /// Human-readable error message.
    pub message: String,

    /// Source file the error is attributed to.
    pub file: String,

    /// Line within `file`.
    pub line: u32,

    /// Formatted stack trace, frames below the capture boundary.
    pub stack_trace: String,
}

impl ErrorEvent {
    /**
     * Builds an event attributed to the caller's source location.
     *
     * A backtrace is captured here so the dashboard shows where the error
     * was reported from, not where this SDK lives.
     */
    #[track_caller]
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        let location = Location::caller();

        Self {
            type_name: type_name.into(),
            message: message.into(),
            file: location.file().to_string(),
            line: location.line(),
            stack_trace: capture_stack_trace(),
        }
    }

    /**
     * Builds an event from any `std::error::Error`, deriving the type tag
     * from the concrete error type.
     */
    #[track_caller]
    pub fn from_error<E: Error>(error: &E) -> Self {
        Self::new(std::any::type_name::<E>(), error.to_string())
    }

    /// Overrides the attributed source location (used by the panic hook,
    /// which knows the real panic site).
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }
}

// ---------------------------------------------------------------------------
// Stack trace capture
// ---------------------------------------------------------------------------

/**
 * Captures and formats a stack trace at the current call site.
 *
 * Frames are rendered one per line as `#N file(line): function`, skipping
 * frames that resolved no useful info and the SDK's own capture frames.
 * Returns an empty string when nothing useful was resolved (e.g. stripped
 * release builds).
 */
pub fn capture_stack_trace() -> String {
    let bt = backtrace::Backtrace::new();
    let mut lines = Vec::new();

    for frame in bt.frames() {
        for symbol in frame.symbols() {
            let function = symbol.name().map(|n| n.to_string());
            let file = symbol.filename().map(|p| p.display().to_string());

            if function.is_none() && file.is_none() {
                continue;
            }

            // Drop the SDK's own frames and the backtrace machinery so the
            // first line is the application's capture boundary.
            if let Some(name) = &function {
                if name.starts_with("backtrace::") || name.starts_with("error_explorer_core::") {
                    continue;
                }
            }

            lines.push((file, symbol.lineno(), function));
        }
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, (file, line, function))| {
            format!(
                "#{i} {}({}): {}",
                file.as_deref().unwrap_or("[unknown]"),
                line.unwrap_or(0),
                function.as_deref().unwrap_or("[unknown]"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
