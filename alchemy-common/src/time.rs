//! Timestamp utilities
//!
//! Rows store timestamps as RFC 3339 text in UTC.

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC time formatted for storage
pub fn now_rfc3339() -> String {
    to_rfc3339(&now())
}

/// Format a timestamp the way the database stores it
pub fn to_rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp, falling back to the Unix epoch for malformed text
pub fn parse_rfc3339(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_round_trip_preserves_micros() {
        let ts = now();
        let parsed = parse_rfc3339(&to_rfc3339(&ts));
        assert_eq!(parsed.timestamp_micros(), ts.timestamp_micros());
    }

    #[test]
    fn test_stored_format_is_utc() {
        assert!(now_rfc3339().ends_with('Z'));
    }

    #[test]
    fn test_malformed_text_falls_back_to_epoch() {
        assert_eq!(parse_rfc3339("yesterday").timestamp(), 0);
    }
}
