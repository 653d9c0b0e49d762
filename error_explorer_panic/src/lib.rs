/*!
 * Error Explorer panic hook — automatic panic capture.
 *
 * `install()` registers a custom `std::panic::set_hook` handler. When a
 * panic occurs, it:
 *
 * 1. Extracts the panic message, source location, and thread name.
 * 2. Builds an `ErrorEvent` with type tag `"panic"` attributed to the
 *    panic site and reports it through the global facade.
 * 3. Calls the previous panic hook, preserving the default stderr output.
 *
 * # Recursion safety
 *
 * A `thread_local` flag breaks the recursion if reporting a panic itself
 * panics.
 */

use std::cell::Cell;
use std::panic::{self, PanicHookInfo};
use std::sync::atomic::{AtomicBool, Ordering};

use error_explorer_core::ErrorEvent;

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

/// Ensures `install()` is idempotent — calling it multiple times won't
/// stack hooks and produce duplicate events per panic.
static INSTALLED: AtomicBool = AtomicBool::new(false);

thread_local! {
    /// Per-thread re-entrancy flag for the hook body.
    static IN_HOOK: Cell<bool> = const { Cell::new(false) };
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/**
 * Installs the panic hook.
 *
 * Replaces the current hook with one that reports the panic through the
 * global facade and then forwards to the *previous* hook. Idempotent —
 * subsequent calls are silent no-ops.
 *
 * Should be called after `error_explorer_core::configure()`; panics
 * captured before configuration are dropped with a diagnostic, like any
 * other unconfigured report.
 */
pub fn install() {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let previous_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        let is_recursive = IN_HOOK.with(|flag| {
            if flag.get() {
                true
            } else {
                flag.set(true);
                false
            }
        });

        if !is_recursive {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handle_panic(info);
            }));

            IN_HOOK.with(|flag| flag.set(false));
        }

        previous_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Internal: build and report the panic event
// ---------------------------------------------------------------------------

fn handle_panic(info: &PanicHookInfo) {
    let message = match info.payload().downcast_ref::<&str>() {
        Some(s) => (*s).to_string(),
        None => match info.payload().downcast_ref::<String>() {
            Some(s) => s.clone(),
            None => "<unknown panic>".to_string(),
        },
    };

    let thread_name = std::thread::current()
        .name()
        .unwrap_or("<unnamed>")
        .to_string();

    let mut event = ErrorEvent::new("panic", format!("{message} [thread: {thread_name}]"));
    if let Some(location) = info.location() {
        event = event.with_location(location.file(), location.line());
    }

    error_explorer_core::report_error(&event);
}
