//! Display helpers for timestamps and names

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse RFC 3339, zone-less local date-times (read as UTC) or bare dates
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// "Jan 5, 2026"; unreadable input yields "Unknown"
pub fn format_date(value: &str) -> String {
    match parse_timestamp(value) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => {
            if !value.is_empty() {
                tracing::warn!("Invalid date received: {}", value);
            }
            "Unknown".to_string()
        }
    }
}

pub fn format_relative_time(value: Option<&str>) -> String {
    format_relative_time_at(value, Utc::now())
}

/// Relative age against `now`; older than a week falls back to `format_date`
pub fn format_relative_time_at(value: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(date) = value.and_then(parse_timestamp) else {
        return "Recently".to_string();
    };

    let seconds = (now - date).num_seconds();
    match seconds {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{} minutes ago", s / 60),
        s if s < 86_400 => format!("{} hours ago", s / 3_600),
        s if s < 604_800 => format!("{} days ago", s / 86_400),
        _ => date.format("%b %-d, %Y").to_string(),
    }
}

/// Up to `max_chars` uppercase initials; emails use their leading characters
pub fn initials(text: &str, max_chars: usize) -> String {
    if text.contains('@') {
        return text.chars().take(max_chars).collect::<String>().to_uppercase();
    }

    text.split(' ')
        .filter_map(|word| word.chars().next())
        .collect::<String>()
        .to_uppercase()
        .chars()
        .take(max_chars)
        .collect()
}

/// Cut to `max_len` characters with a trailing ellipsis
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_len).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn formats_dates_in_several_shapes() {
        assert_eq!(format_date("2026-02-13T10:30:45Z"), "Feb 13, 2026");
        assert_eq!(format_date("2026-02-13T10:30:45"), "Feb 13, 2026");
        assert_eq!(format_date("2026-02-03"), "Feb 3, 2026");
        assert_eq!(format_date("yesterday"), "Unknown");
        assert_eq!(format_date(""), "Unknown");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let ago = |d: Duration| (now - d).to_rfc3339();

        assert_eq!(format_relative_time_at(None, now), "Recently");
        assert_eq!(format_relative_time_at(Some("garbage"), now), "Recently");
        assert_eq!(format_relative_time_at(Some(&ago(Duration::seconds(30))), now), "just now");
        assert_eq!(format_relative_time_at(Some(&ago(Duration::minutes(5))), now), "5 minutes ago");
        assert_eq!(format_relative_time_at(Some(&ago(Duration::hours(3))), now), "3 hours ago");
        assert_eq!(format_relative_time_at(Some(&ago(Duration::days(2))), now), "2 days ago");
        assert_eq!(format_relative_time_at(Some(&ago(Duration::days(30))), now), "Feb 8, 2026");
    }

    #[test]
    fn initials_from_names_and_emails() {
        assert_eq!(initials("Ada Lovelace", 2), "AL");
        assert_eq!(initials("grace brewster murray hopper", 3), "GBM");
        assert_eq!(initials("ada@example.com", 2), "AD");
        assert_eq!(initials("", 2), "");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 8), "a longer...");
    }
}
