//! Display formatting for bid notice fields.
//!
//! Every function here is total: malformed input degrades to a visible
//! fallback string instead of an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::data::BidCategory;

/// Shown for absent values
pub const PLACEHOLDER: &str = "-";

/// Raw input is cut to this many characters when it cannot be parsed as a date
const DATE_FALLBACK_LEN: usize = 16;

const HUNDRED_MILLION: i64 = 100_000_000;
const TEN_MILLION: i64 = 10_000_000;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y%m%d%H%M%S",
    "%Y%m%d%H%M",
];

/// Style token for the category badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Service,
    Construction,
    Goods,
    Neutral,
}

/// Render a timestamp as `MM/DD HH:MM` (24-hour).
pub fn format_date(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return PLACEHOLDER.to_string(),
    };

    match parse_timestamp(raw) {
        Some(dt) => dt.format("%m/%d %H:%M").to_string(),
        None => raw.chars().take(DATE_FALLBACK_LEN).collect(),
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Render an estimated price in 억원 / 천만원 / 원 tiers.
pub fn format_price(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() && s.trim() != "N/A" => s,
        _ => return PLACEHOLDER.to_string(),
    };

    let value = match parse_price(raw.trim()) {
        Some(v) => v,
        None => return raw.to_string(),
    };

    if value >= HUNDRED_MILLION {
        format!("{:.1}억원", value as f64 / HUNDRED_MILLION as f64)
    } else if value >= TEN_MILLION {
        // Truncates: 25,000,000 is 2천만원, not 3
        format!("{}천만원", value / TEN_MILLION)
    } else {
        format!("{}원", group_thousands(value))
    }
}

fn parse_price(s: &str) -> Option<i64> {
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }

    // Some feeds send "150000000.0"
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() < i64::MAX as f64)
        .map(|v| v.trunc() as i64)
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

pub fn badge_style(category: &BidCategory) -> BadgeStyle {
    match category {
        BidCategory::Service => BadgeStyle::Service,
        BidCategory::Construction => BadgeStyle::Construction,
        BidCategory::Goods => BadgeStyle::Goods,
        BidCategory::Other(_) => BadgeStyle::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_tiers() {
        assert_eq!(format_price(Some("150000000")), "1.5억원");
        assert_eq!(format_price(Some("100000000")), "1.0억원");
        assert_eq!(format_price(Some("15000000")), "1천만원");
        assert_eq!(format_price(Some("25000000")), "2천만원");
        assert_eq!(format_price(Some("99999999")), "9천만원");
        assert_eq!(format_price(Some("500")), "500원");
        assert_eq!(format_price(Some("9999999")), "9,999,999원");
        assert_eq!(format_price(Some("1234")), "1,234원");
    }

    #[test]
    fn test_format_price_placeholders() {
        assert_eq!(format_price(None), "-");
        assert_eq!(format_price(Some("N/A")), "-");
        assert_eq!(format_price(Some("")), "-");
    }

    #[test]
    fn test_format_price_unparseable_is_unchanged() {
        assert_eq!(format_price(Some("협의")), "협의");
        assert_eq!(format_price(Some("12abc")), "12abc");
    }

    #[test]
    fn test_format_price_decimal_input() {
        assert_eq!(format_price(Some("150000000.0")), "1.5억원");
        assert_eq!(format_price(Some("999.9")), "999원");
    }

    #[test]
    fn test_group_thousands_negative() {
        assert_eq!(group_thousands(-1234567), "-1,234,567");
        assert_eq!(group_thousands(0), "0");
    }

    #[test]
    fn test_format_date_formats() {
        assert_eq!(format_date(Some("2024-01-15 10:00:00")), "01/15 10:00");
        assert_eq!(format_date(Some("2024-01-15 09:05")), "01/15 09:05");
        assert_eq!(format_date(Some("2024-12-31T23:59:00")), "12/31 23:59");
        assert_eq!(format_date(Some("2024-03-02T18:30:00+09:00")), "03/02 18:30");
        assert_eq!(format_date(Some("202406011430")), "06/01 14:30");
        assert_eq!(format_date(Some("2024-06-01")), "06/01 00:00");
    }

    #[test]
    fn test_format_date_fallbacks() {
        assert_eq!(format_date(None), "-");
        assert_eq!(format_date(Some("")), "-");
        assert_eq!(format_date(Some("   ")), "-");
        assert_eq!(format_date(Some("not a date at all, really")), "not a date at al");
        assert_eq!(format_date(Some("공고일시미정")), "공고일시미정");
    }

    #[test]
    fn test_badge_style() {
        assert_eq!(badge_style(&BidCategory::Service), BadgeStyle::Service);
        assert_eq!(badge_style(&BidCategory::Construction), BadgeStyle::Construction);
        assert_eq!(badge_style(&BidCategory::Goods), BadgeStyle::Goods);
        assert_eq!(
            badge_style(&BidCategory::Other("외자".to_string())),
            BadgeStyle::Neutral
        );
    }
}
