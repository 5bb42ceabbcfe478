//! Append-only description composition.
//!
//! Task descriptions are never overwritten: each update appends a
//! timestamped entry after a blank-line separator, and the first entry on a
//! previously empty description carries a creation header instead.

/// Header prefix used when a description receives its first entry.
pub const CREATED_HEADER: &str = "--- Created on";

/// Header prefix used when an entry is appended to existing content.
pub const UPDATED_HEADER: &str = "--- Updated on";

/// Appends `addition` to `existing` under a timestamped header.
///
/// The prior content is always preserved as a prefix of the result. The
/// timestamp is rendered by the caller so that both backends share one
/// format.
#[must_use]
pub fn append_entry(existing: &str, addition: &str, timestamp: &str) -> String {
    if existing.is_empty() {
        format!("{CREATED_HEADER} {timestamp} ---\n{addition}")
    } else {
        format!("{existing}\n\n{UPDATED_HEADER} {timestamp} ---\n{addition}")
    }
}

/// Timestamp format shared by both backends for description headers.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
