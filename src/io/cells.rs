//! Coercion of single cells into dates and numbers.
//!
//! Date parsing is permissive on purpose: workbook exports mix typed date
//! cells, Excel serial numbers and a zoo of textual formats. Parsing stays
//! deterministic: formats are tried in a fixed order and the first match wins.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::Cell;

/// Largest serial Excel can represent (9999-12-31).
const EXCEL_SERIAL_MAX: f64 = 2_958_465.0;

const DATETIME_FMTS: [&str; 10] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
];

// Month-first before day-first for slashed dates, like pandas.
const DATE_FMTS: [&str; 13] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y.%m.%d",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%b %d %Y",
];

/// Coerce a cell to a timestamp. `None` means "invalid date format".
pub fn coerce_datetime(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(dt) => Some(*dt),
        Cell::Number(v) => excel_serial_to_datetime(*v),
        Cell::Text(s) => parse_datetime_text(s),
        Cell::Empty | Cell::Bool(_) | Cell::Error(_) => None,
    }
}

/// Parse a textual date or date-time.
pub fn parse_datetime_text(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    if let Some(d) = parse_compact_date(s) {
        return Some(d.and_time(NaiveTime::MIN));
    }

    // Serial day numbers stored as text (CSV exports of date cells).
    s.parse::<f64>().ok().and_then(excel_serial_to_datetime)
}

/// `YYYYMMDD` with no separators.
fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[0..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Convert an Excel serial day number (1900 date system) to a timestamp.
///
/// Serials below 1 or beyond 9999-12-31 are rejected; the fractional part is
/// the time of day, rounded to the second. Excel counts a fictitious
/// 1900-02-29 as serial 60: that serial is rejected and serials 1..60 are
/// shifted one day so serial 1 is 1900-01-01.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(1.0..=EXCEL_SERIAL_MAX).contains(&serial) {
        return None;
    }
    let days = match serial.trunc() as i64 {
        60 => return None,
        d if d < 60 => d + 1,
        d => d,
    };
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::days(days) + Duration::seconds(seconds))
}

/// Coerce a cell to a number. `None` means "not numeric".
///
/// The result may still be non-finite (`"NaN"`, `"inf"`); callers decide
/// whether that is acceptable.
pub fn coerce_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(v) => Some(*v),
        Cell::Text(s) => parse_number_text(s),
        Cell::Empty | Cell::Bool(_) | Cell::DateTime(_) | Cell::Error(_) => None,
    }
}

/// Parse numeric text, tolerating a leading `$` and `,` thousands separators.
pub fn parse_number_text(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, s),
    };
    let s = s.strip_prefix('$').unwrap_or(s).trim_start();
    if s.is_empty() {
        return None;
    }
    let cleaned: String = s.chars().filter(|&c| c != ',').collect();
    let v = cleaned.parse::<f64>().ok()?;
    Some(if negative { -v } else { v })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn parses_common_text_dates() {
        let expected = ymd(2024, 1, 31);
        for s in [
            "2024-01-31",
            " 2024/01/31 ",
            "01/31/2024",
            "31-01-2024",
            "20240131",
            "31-Jan-2024",
            "31 Jan 2024",
            "Jan 31, 2024",
            "January 31, 2024",
            "2024-01-31T00:00:00",
            "2024-01-31 00:00:00",
        ] {
            assert_eq!(parse_datetime_text(s), Some(expected), "failed on {s:?}");
        }
    }

    #[test]
    fn month_first_wins_when_ambiguous() {
        assert_eq!(parse_datetime_text("02/03/2024"), Some(ymd(2024, 2, 3)));
        // Day 13 cannot be a month, so day-first applies.
        assert_eq!(parse_datetime_text("13/02/2024"), Some(ymd(2024, 2, 13)));
    }

    #[test]
    fn keeps_time_of_day() {
        let dt = parse_datetime_text("2024-01-31 09:30:15").unwrap();
        assert_eq!(dt, ymd(2024, 1, 31) + Duration::seconds(9 * 3600 + 30 * 60 + 15));
    }

    #[test]
    fn rejects_garbage_dates() {
        for s in ["", "not a date", "2024-13-01", "2024-02-30", "20241301", "yesterday"] {
            assert_eq!(parse_datetime_text(s), None, "accepted {s:?}");
        }
        assert_eq!(coerce_datetime(&Cell::Bool(true)), None);
    }

    #[test]
    fn excel_serials() {
        assert_eq!(excel_serial_to_datetime(45322.0), Some(ymd(2024, 1, 31)));
        assert_eq!(
            excel_serial_to_datetime(45322.5),
            Some(ymd(2024, 1, 31) + Duration::hours(12))
        );
        assert_eq!(excel_serial_to_datetime(0.0), None);
        assert_eq!(excel_serial_to_datetime(-5.0), None);
        assert_eq!(excel_serial_to_datetime(f64::NAN), None);
        assert_eq!(coerce_datetime(&Cell::Number(45322.0)), Some(ymd(2024, 1, 31)));
    }

    #[test]
    fn early_serials_skip_the_phantom_leap_day() {
        assert_eq!(excel_serial_to_datetime(1.0), Some(ymd(1900, 1, 1)));
        assert_eq!(excel_serial_to_datetime(59.0), Some(ymd(1900, 2, 28)));
        assert_eq!(excel_serial_to_datetime(60.0), None);
        assert_eq!(excel_serial_to_datetime(61.0), Some(ymd(1900, 3, 1)));
    }

    #[test]
    fn serial_numbers_in_text() {
        assert_eq!(parse_datetime_text("45322"), Some(ymd(2024, 1, 31)));
        assert_eq!(
            parse_datetime_text(" 45322.5 "),
            Some(ymd(2024, 1, 31) + Duration::hours(12))
        );
        assert_eq!(coerce_datetime(&Cell::text("45322")), Some(ymd(2024, 1, 31)));
        // Eight digits stay a calendar date.
        assert_eq!(parse_datetime_text("20240131"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_datetime_text("9999999"), None);
        assert_eq!(parse_datetime_text("NaN"), None);
    }

    #[test]
    fn numbers_from_text() {
        assert_eq!(parse_number_text("12.5"), Some(12.5));
        assert_eq!(parse_number_text(" $1,234.50 "), Some(1234.5));
        assert_eq!(parse_number_text("-$3"), Some(-3.0));
        assert_eq!(parse_number_text("abc"), None);
        assert_eq!(parse_number_text("$"), None);
        assert!(parse_number_text("NaN").unwrap().is_nan());
        assert_eq!(coerce_number(&Cell::Bool(true)), None);
        assert_eq!(coerce_number(&Cell::Number(-2.0)), Some(-2.0));
    }
}
