/*!
 * What we send: wire structures, severity levels, fingerprints, constants.
 */

pub mod constants;
pub mod fingerprint;
pub mod levels;
pub mod payload;

use chrono::{SecondsFormat, Utc};

/// Current UTC time as an RFC-3339 string with second precision and a
/// numeric offset (`2026-08-27T12:00:00+00:00`), matching the backend's
/// expected timestamp format.
pub(crate) fn atom_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}
