use chrono::{DateTime, Local};

pub const SLUG_MAX_CHARS: usize = 80;
pub const SLUG_FALLBACK: &str = "unknown";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const CJK_UNIFIED_IDEOGRAPHS: std::ops::RangeInclusive<char> = '\u{4e00}'..='\u{9fff}';

fn is_slug_char(ch: char) -> bool {
    ch.is_ascii_lowercase()
        || ch.is_ascii_digit()
        || ch == '_'
        || ch == '-'
        || CJK_UNIFIED_IDEOGRAPHS.contains(&ch)
}

/// Lowercases `value`, joins whitespace runs with `_`, drops anything that is
/// not `[a-z0-9_-]` or a CJK ideograph and caps the result at 80 chars.
/// Returns `"unknown"` rather than an empty slug.
pub fn slugify(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let joined = lowered.split_whitespace().collect::<Vec<_>>().join("_");
    let slug: String = joined
        .chars()
        .filter(|ch| is_slug_char(*ch))
        .take(SLUG_MAX_CHARS)
        .collect();
    if slug.is_empty() {
        SLUG_FALLBACK.to_string()
    } else {
        slug
    }
}

pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn sanitize_timestamp(raw: Option<&str>) -> String {
    sanitize_timestamp_at(raw, Local::now())
}

/// Keeps `[0-9A-Za-z_-]` from `raw`; an empty result is replaced by `now`
/// formatted as `YYYYMMDD_HHMMSS`.
pub fn sanitize_timestamp_at(raw: Option<&str>, now: DateTime<Local>) -> String {
    let cleaned: String = raw
        .unwrap_or_default()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-')
        .collect();
    if cleaned.is_empty() {
        format_timestamp(now)
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn whitespace_runs_collapse_to_a_single_underscore() {
        assert_eq!(slugify("  Leg \t\n Day  "), "leg_day");
    }

    #[test]
    fn timestamp_fallback_uses_fixed_format() {
        let now = Local
            .with_ymd_and_hms(2026, 3, 4, 5, 6, 7)
            .single()
            .expect("unambiguous local time");
        assert_eq!(sanitize_timestamp_at(Some("::  //"), now), "20260304_050607");
        assert_eq!(sanitize_timestamp_at(None, now), "20260304_050607");
    }
}
