//! Number and date formatting with the dashboard's fixed `es-ES` conventions.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Most fraction digits shown by `format_number`
const MAX_FRACTION_DIGITS: usize = 3;

/// Spanish only groups thousands once the integer part has five digits
/// (1234 stays "1234", 12345 becomes "12.345").
const MIN_GROUPING_DIGITS: usize = 5;

/// Format a number the way `Intl.NumberFormat('es-ES')` does
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    if digits.len() < MIN_GROUPING_DIGITS {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Parse the timestamp shapes the API emits into local wall-clock time.
///
/// Timestamps with an offset are converted to the local zone; naive ones are
/// taken as already local.
fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a date as `d/m/yyyy`. Unparseable input is returned unchanged.
pub fn format_date(input: &str) -> String {
    match parse_timestamp(input) {
        Some(dt) => dt.format("%-d/%-m/%Y").to_string(),
        None => input.to_string(),
    }
}

/// Format a date and time as `d/m/yyyy, H:MM:SS`. Unparseable input is returned unchanged.
pub fn format_date_time(input: &str) -> String {
    match parse_timestamp(input) {
        Some(dt) => dt.format("%-d/%-m/%Y, %-H:%M:%S").to_string(),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1234.0), "1234");
        assert_eq!(format_number(12345.0), "12.345");
        assert_eq!(format_number(1234567.0), "1.234.567");
        assert_eq!(format_number(1234.5), "1234,5");
        assert_eq!(format_number(98765.4321), "98.765,432");
        assert_eq!(format_number(-12345.25), "-12.345,25");
        assert_eq!(format_number(-0.0001), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-07"), "7/3/2024");
        assert_eq!(format_date("2024-12-25T23:59:59"), "25/12/2024");
        assert_eq!(format_date("2024-12-25 08:00:00.123456"), "25/12/2024");
        assert_eq!(format_date("not a date"), "not a date");
    }

    #[test]
    fn test_format_date_time() {
        assert_eq!(format_date_time("2024-03-07T09:05:03"), "7/3/2024, 9:05:03");
        assert_eq!(format_date_time("2024-11-30T17:45"), "30/11/2024, 17:45:00");
        assert_eq!(format_date_time("2024-03-07"), "7/3/2024, 0:00:00");
        assert_eq!(format_date_time(""), "");
    }
}
