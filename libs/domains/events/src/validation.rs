//! Input validation helpers
//!
//! Pure functions shared by the service and the HTTP layer. None of them
//! fail; invalid input maps to `false`, `None` or a supplied default.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::PaginationMeta;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 5;
pub const MAX_LIMIT: i64 = 100;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// `true` iff `s` is exactly 24 ASCII hex characters.
pub fn is_valid_object_id(s: &str) -> bool {
    s.len() == 24 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Leading integer of `s`: optional sign then digits, rest ignored.
///
/// `"12abc"` is 12 and `"3.7"` is 3. Returns `None` when no digits lead
/// or the value does not fit in an `i64`.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// [`parse_leading_int`] falling back to `default` on absent or bad input.
pub fn safe_parse_int(value: Option<&str>, default: i64) -> i64 {
    value.and_then(parse_leading_int).unwrap_or(default)
}

/// Parse a client-supplied date into UTC, at millisecond precision.
///
/// Accepts RFC 3339, RFC 2822, `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS[.fff]]`,
/// `YYYY-MM-DD HH:MM[:SS]` (naive forms are UTC) and all-digit epoch
/// milliseconds.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let parsed = if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    } else {
        DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::parse_from_rfc2822(s))
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NAIVE_DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                    .or_else(|| {
                        NaiveDate::parse_from_str(s, "%Y-%m-%d")
                            .ok()
                            .and_then(|d| d.and_hms_opt(0, 0, 0))
                    })
                    .map(|naive| naive.and_utc())
            })
    };

    parsed.and_then(|dt| DateTime::from_timestamp_millis(dt.timestamp_millis()))
}

/// Trimmed, non-empty string or `None`.
pub fn sanitize_string(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Pagination block for page `page` of `limit` items out of `total`.
///
/// A `limit` of 0 yields zero pages.
pub fn build_pagination_meta(page: u64, limit: u64, total: u64) -> PaginationMeta {
    let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
    let has_next_page = page < total_pages;
    let has_prev_page = page > 1;

    PaginationMeta {
        current_page: page,
        total_pages,
        total_items: total,
        limit,
        has_next_page,
        has_prev_page,
        next_page: has_next_page.then(|| page + 1),
        prev_page: has_prev_page.then(|| page - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_is_valid_object_id() {
        assert!(is_valid_object_id("65f1c2a9e4b0a1b2c3d4e5f6"));
        assert!(is_valid_object_id("65F1C2A9E4B0A1B2C3D4E5F6"));
        assert!(!is_valid_object_id(""));
        assert!(!is_valid_object_id("65f1c2a9e4b0a1b2c3d4e5f"));
        assert!(!is_valid_object_id("65f1c2a9e4b0a1b2c3d4e5f6a"));
        assert!(!is_valid_object_id("65f1c2a9e4b0a1b2c3d4e5fz"));
        assert!(!is_valid_object_id("65f1c2a9e4b0a1b2c3d4e5f\u{e9}"));
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("12abc"), Some(12));
        assert_eq!(parse_leading_int("3.7"), Some(3));
        assert_eq!(parse_leading_int("  -5 "), Some(-5));
        assert_eq!(parse_leading_int("+8"), Some(8));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("99999999999999999999"), None);
    }

    #[test]
    fn test_safe_parse_int_defaults() {
        assert_eq!(safe_parse_int(None, 5), 5);
        assert_eq!(safe_parse_int(Some(""), 5), 5);
        assert_eq!(safe_parse_int(Some("x1"), 5), 5);
        assert_eq!(safe_parse_int(Some("20"), 5), 20);
    }

    #[test]
    fn test_parse_date_formats() {
        let rfc3339 = parse_date("2026-03-15T10:00:00.000Z").unwrap();
        assert_eq!((rfc3339.year(), rfc3339.month(), rfc3339.day()), (2026, 3, 15));
        assert_eq!(rfc3339.hour(), 10);

        let offset = parse_date("2026-03-15T12:00:00+02:00").unwrap();
        assert_eq!(offset, rfc3339);

        let rfc2822 = parse_date("Sun, 15 Mar 2026 10:00:00 +0000").unwrap();
        assert_eq!(rfc2822, rfc3339);

        let naive = parse_date("2026-03-15T10:00").unwrap();
        assert_eq!(naive, rfc3339);

        let spaced = parse_date("2026-03-15 10:00:00").unwrap();
        assert_eq!(spaced, rfc3339);

        let date_only = parse_date("2026-03-15").unwrap();
        assert_eq!(date_only.hour(), 0);

        let millis = parse_date("1773568800000").unwrap();
        assert_eq!(millis, rfc3339);
    }

    #[test]
    fn test_parse_date_truncates_to_millis() {
        let dt = parse_date("2026-03-15T10:00:00.123456789Z").unwrap();
        assert_eq!(dt.nanosecond(), 123_000_000);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("not-a-date").is_none());
        assert!(parse_date("").is_none());
        assert!(parse_date("   ").is_none());
        assert!(parse_date("2026-13-45").is_none());
    }

    #[test]
    fn test_sanitize_string() {
        assert_eq!(sanitize_string(Some("  Alice ")), Some("Alice".to_string()));
        assert_eq!(sanitize_string(Some("   ")), None);
        assert_eq!(sanitize_string(None), None);
    }

    #[test]
    fn test_build_pagination_meta_first_page() {
        let meta = build_pagination_meta(1, 5, 12);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next_page);
        assert!(!meta.has_prev_page);
        assert_eq!(meta.next_page, Some(2));
        assert_eq!(meta.prev_page, None);
        assert_eq!(meta.total_items, 12);
    }

    #[test]
    fn test_build_pagination_meta_last_and_beyond() {
        let last = build_pagination_meta(3, 5, 12);
        assert!(!last.has_next_page);
        assert_eq!(last.prev_page, Some(2));

        let beyond = build_pagination_meta(9, 5, 12);
        assert!(!beyond.has_next_page);
        assert!(beyond.has_prev_page);
    }

    #[test]
    fn test_build_pagination_meta_edge_cases() {
        let empty = build_pagination_meta(1, 5, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next_page);

        let zero_limit = build_pagination_meta(1, 0, 10);
        assert_eq!(zero_limit.total_pages, 0);
    }
}
