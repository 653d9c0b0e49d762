/**
 * The breadcrumb trail — a process-wide, bounded, ordered record of recent
 * application events.
 *
 * Breadcrumbs are attached to every outgoing payload so the dashboard can
 * reconstruct what happened in the moments before an error. The trail is a
 * FIFO ring: when a new breadcrumb would exceed the capacity, the oldest
 * entry is evicted.
 *
 * The trail is an explicitly owned service, not an ambient global. The
 * `Reporter` holds one behind an `Arc` for the process lifetime, and
 * instrumentation code can hold its own clone of that `Arc` to add
 * breadcrumbs without going through the reporting path. All mutation is
 * serialized by an internal `Mutex`, so `add` and `snapshot` are safe to
 * call from any thread.
 */
use std::collections::VecDeque;
use std::sync::Mutex;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::protocol::atom_timestamp;
use crate::protocol::levels::{BreadcrumbCategory, LogLevel};

// ---------------------------------------------------------------------------
// Breadcrumb
// ---------------------------------------------------------------------------

/**
 * A single timestamped application event.
 *
 * Immutable once created; owned exclusively by a `BreadcrumbTrail`.
 * Serializes to the exact shape the backend renders in its timeline view,
 * including the category icon.
 */
#[derive(Debug, Clone, Serialize)]
pub struct Breadcrumb {
    /// RFC-3339 UTC timestamp captured at `add` time.
    pub timestamp: String,

    /// Human-readable description of the event.
    pub message: String,

    /// What kind of event this is.
    pub category: BreadcrumbCategory,

    /// Severity of the event.
    pub level: LogLevel,

    /// Free-form structured data, insertion-ordered.
    pub data: Map<String, Value>,

    /// Emoji derived from the category.
    pub icon: &'static str,
}

// ---------------------------------------------------------------------------
// Capacity validation
// ---------------------------------------------------------------------------

/// Smallest allowed trail capacity.
pub const MIN_CAPACITY: usize = 10;

/// Largest allowed trail capacity.
pub const MAX_CAPACITY: usize = 100;

/// Capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 50;

/// Error returned by `set_capacity` / `with_capacity` for out-of-range values.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("breadcrumb capacity must be between {MIN_CAPACITY} and {MAX_CAPACITY}, got {0}")]
pub struct InvalidCapacity(pub usize);

// ---------------------------------------------------------------------------
// BreadcrumbTrail
// ---------------------------------------------------------------------------

/**
 * Bounded FIFO trail of `Breadcrumb`s.
 *
 * Invariants:
 * - `len() <= capacity()` at all times, including across concurrent `add`s.
 * - Insertion order is preserved; `snapshot()` returns oldest first.
 * - On overflow exactly the single oldest entry is evicted.
 */
pub struct BreadcrumbTrail {
    inner: Mutex<TrailState>,
}

struct TrailState {
    entries: VecDeque<Breadcrumb>,
    capacity: usize,
}

impl Default for BreadcrumbTrail {
    fn default() -> Self {
        Self::new()
    }
}

impl BreadcrumbTrail {
    /// Creates an empty trail with the default capacity (50).
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TrailState {
                entries: VecDeque::with_capacity(DEFAULT_CAPACITY),
                capacity: DEFAULT_CAPACITY,
            }),
        }
    }

    /// Creates an empty trail with an explicit capacity in [10, 100].
    pub fn with_capacity(capacity: usize) -> Result<Self, InvalidCapacity> {
        validate_capacity(capacity)?;

        Ok(Self {
            inner: Mutex::new(TrailState {
                entries: VecDeque::with_capacity(capacity),
                capacity,
            }),
        })
    }

    /**
     * Appends a breadcrumb with the current timestamp.
     *
     * Always succeeds. If the trail is full, the oldest entry is evicted
     * first, so the length never exceeds the capacity.
     */
    pub fn add(
        &self,
        message: impl Into<String>,
        category: BreadcrumbCategory,
        level: LogLevel,
        data: Map<String, Value>,
    ) {
        let breadcrumb = Breadcrumb {
            timestamp: atom_timestamp(),
            message: message.into(),
            category,
            level,
            data,
            icon: category.icon(),
        };

        if let Ok(mut state) = self.inner.lock() {
            state.entries.push_back(breadcrumb);
            while state.entries.len() > state.capacity {
                state.entries.pop_front();
            }
        }
    }

    /**
     * Returns an ordered copy of the current breadcrumbs, oldest first.
     *
     * Never observes a partially evicted trail — the copy is taken under
     * the same lock that `add` holds.
     */
    pub fn snapshot(&self) -> Vec<Breadcrumb> {
        match self.inner.lock() {
            Ok(state) => state.entries.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Removes all breadcrumbs, keeping the capacity.
    pub fn clear(&self) {
        if let Ok(mut state) = self.inner.lock() {
            state.entries.clear();
        }
    }

    /**
     * Updates the capacity.
     *
     * Rejects values outside [10, 100]. When the new capacity is smaller
     * than the current length, the oldest entries are trimmed immediately
     * so the invariant holds without waiting for the next `add`.
     */
    pub fn set_capacity(&self, capacity: usize) -> Result<(), InvalidCapacity> {
        validate_capacity(capacity)?;

        if let Ok(mut state) = self.inner.lock() {
            state.capacity = capacity;
            while state.entries.len() > capacity {
                state.entries.pop_front();
            }
        }

        Ok(())
    }

    /// Current capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().map(|state| state.capacity).unwrap_or(DEFAULT_CAPACITY)
    }

    /// Number of breadcrumbs currently held.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|state| state.entries.len()).unwrap_or(0)
    }

    /// `true` when the trail holds no breadcrumbs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -----------------------------------------------------------------------
    // Convenience loggers — formatting wrappers over `add`
    // -----------------------------------------------------------------------

    /// Records a navigation event, e.g. a page or screen change.
    pub fn log_navigation(&self, from: &str, to: &str, mut data: Map<String, Value>) {
        data.insert("from".into(), Value::String(from.into()));
        data.insert("to".into(), Value::String(to.into()));

        self.add(
            format!("Navigation: {from} → {to}"),
            BreadcrumbCategory::Navigation,
            LogLevel::Info,
            data,
        );
    }

    /// Records a user-initiated action.
    pub fn log_user_action(&self, action: &str, mut data: Map<String, Value>) {
        data.insert("action".into(), Value::String(action.into()));

        self.add(
            format!("User action: {action}"),
            BreadcrumbCategory::UserAction,
            LogLevel::Info,
            data,
        );
    }

    /**
     * Records an outgoing or incoming HTTP request.
     *
     * Severity is derived from the status code: 5xx is an error, 4xx a
     * warning, anything else (or no status) is informational.
     */
    pub fn log_http_request(
        &self,
        method: &str,
        url: &str,
        status_code: Option<u16>,
        mut data: Map<String, Value>,
    ) {
        let level = match status_code {
            Some(status) if status >= 500 => LogLevel::Error,
            Some(status) if status >= 400 => LogLevel::Warning,
            _ => LogLevel::Info,
        };

        let mut message = format!("HTTP {method} {url}");
        if let Some(status) = status_code {
            message.push_str(&format!(" [{status}]"));
        }

        data.insert("method".into(), Value::String(method.into()));
        data.insert("url".into(), Value::String(url.into()));
        data.insert("status_code".into(), serde_json::json!(status_code));

        self.add(message, BreadcrumbCategory::HttpRequest, level, data);
    }

    /**
     * Records a database query.
     *
     * Queries slower than 5 s log as errors, slower than 1 s as warnings.
     * The message truncates the query text at 100 characters; the full
     * text is kept in `data`.
     */
    pub fn log_query(&self, query: &str, duration_ms: Option<f64>, mut data: Map<String, Value>) {
        let level = match duration_ms {
            Some(duration) if duration > 5000.0 => LogLevel::Error,
            Some(duration) if duration > 1000.0 => LogLevel::Warning,
            _ => LogLevel::Info,
        };

        let mut shown = query.to_string();
        if shown.chars().count() > 100 {
            shown = shown.chars().take(100).collect::<String>() + "...";
        }

        let mut message = format!("Query: {shown}");
        if let Some(duration) = duration_ms {
            message.push_str(&format!(" ({duration}ms)"));
        }

        data.insert("query".into(), Value::String(query.into()));
        data.insert("duration_ms".into(), serde_json::json!(duration_ms));

        self.add(message, BreadcrumbCategory::Database, level, data);
    }

    /**
     * Records a performance metric.
     *
     * Millisecond metrics above 1000 and megabyte metrics above 100 log
     * as warnings; everything else is informational.
     */
    pub fn log_performance(&self, metric: &str, value: f64, unit: &str) {
        let level = match unit {
            "ms" if value > 1000.0 => LogLevel::Warning,
            "mb" if value > 100.0 => LogLevel::Warning,
            _ => LogLevel::Info,
        };

        let mut data = Map::new();
        data.insert("metric".into(), Value::String(metric.into()));
        data.insert("value".into(), serde_json::json!(value));
        data.insert("unit".into(), Value::String(unit.into()));

        self.add(
            format!("Performance: {metric} = {value}{unit}"),
            BreadcrumbCategory::Performance,
            level,
            data,
        );
    }

    /// Records a security-relevant event (defaults to warning severity).
    pub fn log_security(&self, event: &str, level: LogLevel, mut data: Map<String, Value>) {
        data.insert("event".into(), Value::String(event.into()));

        self.add(
            format!("Security: {event}"),
            BreadcrumbCategory::Security,
            level,
            data,
        );
    }
}

fn validate_capacity(capacity: usize) -> Result<(), InvalidCapacity> {
    if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
        return Err(InvalidCapacity(capacity));
    }
    Ok(())
}
