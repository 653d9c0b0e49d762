/**
 * Severity levels and breadcrumb categories.
 *
 * Both enums serialize to the exact string values the Error Explorer
 * backend expects, so they can be embedded directly in payloads and
 * breadcrumbs without translation.
 */
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LogLevel
// ---------------------------------------------------------------------------

/**
 * Severity of a reported message or breadcrumb.
 *
 * Wire values are the lowercase variant names (`"debug"`, `"info"`, ...).
 * Ordering follows `priority()`: `Debug` is the least severe,
 * `Emergency` the most.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl LogLevel {
    /**
     * Numeric priority used for minimum-level filtering.
     *
     * Matches the PSR-3 style scale used by the backend: messages whose
     * priority is below the configured minimum are not reported.
     */
    pub fn priority(self) -> u16 {
        match self {
            Self::Debug => 100,
            Self::Info => 200,
            Self::Warning => 300,
            Self::Error => 400,
            Self::Critical => 500,
            Self::Alert => 550,
            Self::Emergency => 600,
        }
    }

    /// `true` for `Error` and anything above it.
    pub fn is_high_severity(self) -> bool {
        self >= Self::Error
    }

    /// The wire value, e.g. `"warning"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
            Self::Alert => "alert",
            Self::Emergency => "emergency",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown level name.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            "alert" => Ok(Self::Alert),
            "emergency" => Ok(Self::Emergency),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// BreadcrumbCategory
// ---------------------------------------------------------------------------

/**
 * Category of a breadcrumb — what kind of application event it records.
 *
 * Wire values are the short names the backend renders
 * (`"user"` for `UserAction`, `"http"` for `HttpRequest`, `"query"` for
 * `Database`, `"business"` for `BusinessLogic`; the rest match their
 * variant name in lowercase).
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreadcrumbCategory {
    #[serde(rename = "navigation")]
    Navigation,
    #[serde(rename = "user")]
    UserAction,
    #[serde(rename = "http")]
    HttpRequest,
    #[serde(rename = "query")]
    Database,
    #[serde(rename = "system")]
    System,
    #[serde(rename = "custom")]
    Custom,
    #[serde(rename = "performance")]
    Performance,
    #[serde(rename = "security")]
    Security,
    #[serde(rename = "business")]
    BusinessLogic,
}

impl BreadcrumbCategory {
    /// Emoji shown next to the breadcrumb in the dashboard timeline.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Navigation => "🧭",
            Self::UserAction => "👤",
            Self::HttpRequest => "🌐",
            Self::Database => "🗄️",
            Self::System => "⚙️",
            Self::Custom => "🏷️",
            Self::Performance => "⚡",
            Self::Security => "🔒",
            Self::BusinessLogic => "💼",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /**
     * Priorities must be strictly increasing from Debug to Emergency —
     * the minimum-level gate depends on it.
     */
    #[test]
    fn test_priorities_are_increasing() {
        let levels = [
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
            LogLevel::Critical,
            LogLevel::Alert,
            LogLevel::Emergency,
        ];

        for pair in levels.windows(2) {
            assert!(pair[0].priority() < pair[1].priority());
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_high_severity_boundary() {
        assert!(!LogLevel::Warning.is_high_severity());
        assert!(LogLevel::Error.is_high_severity());
        assert!(LogLevel::Emergency.is_high_severity());
    }

    #[test]
    fn test_level_round_trips_through_str() {
        for name in ["debug", "info", "warning", "error", "critical", "alert", "emergency"] {
            let level: LogLevel = name.parse().expect("should parse");
            assert_eq!(level.as_str(), name);
        }

        assert!("verbose".parse::<LogLevel>().is_err());
    }

    /**
     * Wire values must match what the backend expects — `UserAction`
     * serializes as "user", `Database` as "query", etc.
     */
    #[test]
    fn test_category_wire_values() {
        let cases = [
            (BreadcrumbCategory::Navigation, "navigation"),
            (BreadcrumbCategory::UserAction, "user"),
            (BreadcrumbCategory::HttpRequest, "http"),
            (BreadcrumbCategory::Database, "query"),
            (BreadcrumbCategory::BusinessLogic, "business"),
        ];

        for (category, expected) in cases {
            let value = serde_json::to_value(category).expect("serializes");
            assert_eq!(value, serde_json::json!(expected));
        }
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let value = serde_json::to_value(LogLevel::Warning).expect("serializes");
        assert_eq!(value, serde_json::json!("warning"));
    }
}
