// src/format.rs - Number and time formatting for the dashboard tables
use chrono::Local;

use crate::types::parse_timestamp;

/// Two decimals with thousands separators: `64250.5` -> `64,250.50`.
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // never "-0.00"
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Like `format_usd` but positive values carry an explicit `+`.
pub fn format_signed_usd(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", format_usd(value))
    } else {
        format_usd(value)
    }
}

pub fn format_optional_usd(value: Option<f64>) -> String {
    value.map(format_usd).unwrap_or_else(|| "-".to_string())
}

pub fn format_percent(value: f64) -> String {
    if value > 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

/// Local wall-clock time, or the raw text if the backend sent something odd.
pub fn format_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn format_date_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd_grouping() {
        assert_eq!(format_usd(0.0), "0.00");
        assert_eq!(format_usd(999.999), "1,000.00");
        assert_eq!(format_usd(64250.5), "64,250.50");
        assert_eq!(format_usd(1234567.891), "1,234,567.89");
        assert_eq!(format_usd(-1234.5), "-1,234.50");
        assert_eq!(format_usd(-0.001), "0.00");
        assert_eq!(format_usd(f64::NAN), "-");
    }

    #[test]
    fn test_signed_and_optional() {
        assert_eq!(format_signed_usd(12.0), "+12.00");
        assert_eq!(format_signed_usd(-12.0), "-12.00");
        assert_eq!(format_signed_usd(0.0), "0.00");
        assert_eq!(format_optional_usd(None), "-");
        assert_eq!(format_optional_usd(Some(1500.0)), "1,500.00");
        assert_eq!(format_percent(1.234), "+1.23%");
        assert_eq!(format_percent(-0.5), "-0.50%");
    }

    #[test]
    fn test_unparsable_time_shown_verbatim() {
        assert_eq!(format_time("soon"), "soon");
        assert_eq!(format_date_time(""), "");
        assert_eq!(format_time("2025-01-02T10:11:12").len(), 8);
    }
}
