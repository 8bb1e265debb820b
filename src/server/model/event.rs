use chrono::{DateTime, Utc};

/// Tag identifying this application in the audit table
pub const AUDIT_TAG: &str = "AGRICULTURE_APP";
/// Format of the audit event timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Event type recorded for file downloads
pub const DOWNLOAD_EVENT: &str = "Download";
pub const CSV_DETAIL: &str = "CSV file";
pub const PNG_DETAIL: &str = "PNG file";

/// One append-only row of the usage audit table
#[derive(Clone, Debug, PartialEq)]
pub struct AuditEvent {
    pub event_type: String,
    pub detail: String,
    /// Selected region names joined by `", "`
    pub unit: String,
    /// Formatted as [`TIMESTAMP_FORMAT`]
    pub timestamp: String,
    pub tag: &'static str,
}

impl AuditEvent {
    pub fn new(event_type: &str, detail: &str, unit: &str, at: DateTime<Utc>) -> Self {
        Self {
            event_type: event_type.to_string(),
            detail: detail.to_string(),
            unit: unit.to_string(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            tag: AUDIT_TAG,
        }
    }
}
