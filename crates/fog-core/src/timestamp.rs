//! RFC 3339 timestamps → epoch milliseconds.
//!
//! Items carry their `lastModified` time as an ISO string; the default
//! reactor diff compares the parsed instants, not the strings, so two
//! spellings of the same instant are equal.

use chrono::{DateTime, SecondsFormat, Utc};

/// Parse an RFC 3339 timestamp into milliseconds since the Unix epoch.
/// Returns `None` for anything else, including out-of-range fields.
/// Digits past the millisecond are truncated.
pub fn parse_timestamp(text: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|instant| instant.timestamp_millis())
}

/// Format epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.fffZ`. Instants chrono
/// cannot represent collapse to the epoch.
pub fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_with_millis() {
        assert_eq!(parse_timestamp("1970-01-01T00:00:00.000Z"), Some(0));
        assert_eq!(parse_timestamp("1970-01-01T00:00:01.250Z"), Some(1_250));
        assert_eq!(
            parse_timestamp("2024-03-01T12:30:00Z"),
            Some(1_709_296_200_000)
        );
    }

    #[test]
    fn offsets_normalize_to_same_instant() {
        let utc = parse_timestamp("2024-03-01T12:30:00Z");
        let plus = parse_timestamp("2024-03-01T14:30:00+02:00");
        let minus = parse_timestamp("2024-03-01T07:30:00-05:00");
        assert_eq!(utc, plus);
        assert_eq!(utc, minus);
    }

    #[test]
    fn extra_precision_is_truncated() {
        assert_eq!(parse_timestamp("1970-01-01T00:00:00.123456Z"), Some(123));
        assert_eq!(parse_timestamp("1970-01-01T00:00:00.5Z"), Some(500));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse_timestamp("  1970-01-01T00:00:02Z\n"), Some(2_000));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-01T00:00:00Z"), None);
        assert_eq!(parse_timestamp("2024-02-30T00:00:00Z"), None);
        assert_eq!(parse_timestamp("2024-01-01T00:00:00"), None);
        assert_eq!(parse_timestamp("2024-01-01T00:00:00Zjunk"), None);
    }

    #[test]
    fn formatting_inverts_parsing() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_timestamp(1_709_296_200_250), "2024-03-01T12:30:00.250Z");
        for millis in [951_782_400_000, 1_709_251_199_999, -86_400_001] {
            assert_eq!(parse_timestamp(&format_timestamp(millis)), Some(millis));
        }
    }
}
