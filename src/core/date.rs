use chrono::NaiveDate;

use super::event::{Field, NO_DATE};
use crate::error::InvalidDate;

pub const INVALID_DATE_LABEL: &str = "Invalid Date";

/// A `DD-MM-YY` date resolved to a sortable key and a display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDate {
    pub date: NaiveDate,
    /// `YYYY-MM-DD`; lexicographic order is chronological.
    pub key: String,
    /// e.g. "Thursday, 5 March, 2026"
    pub label: String,
}

/// Parse a two-digit-year `DD-MM-YY` string. The century is always 20xx.
pub fn normalize(input: &str) -> Result<NormalizedDate, InvalidDate> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split('-').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(InvalidDate::new(input));
    };
    let (day, month, year) = (*day, *month, *year);

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(day) || !all_digits(month) || !all_digits(year) {
        return Err(InvalidDate::new(input));
    }
    if day.len() > 2 || month.len() > 2 || year.len() != 2 {
        return Err(InvalidDate::new(input));
    }

    let reassembled = format!("20{}-{:0>2}-{:0>2}", year, month, day);
    let date = NaiveDate::parse_from_str(&reassembled, "%Y-%m-%d")
        .map_err(|_| InvalidDate::new(input))?;

    Ok(NormalizedDate {
        date,
        key: date.format("%Y-%m-%d").to_string(),
        label: format_label(date),
    })
}

pub fn format_label(date: NaiveDate) -> String {
    date.format("%A, %-d %B, %Y").to_string()
}

/// Display label for a possibly-missing date. Never fails.
pub fn label_for(date: &Field<String>) -> String {
    match date {
        Field::Missing => NO_DATE.to_string(),
        Field::Present(raw) => match normalize(raw) {
            Ok(n) => n.label,
            Err(e) => {
                log::debug!("{}", e);
                INVALID_DATE_LABEL.to_string()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_two_digit_year() {
        let n = normalize("05-03-26").unwrap();
        assert_eq!(n.key, "2026-03-05");
        assert_eq!(n.label, "Thursday, 5 March, 2026");
        assert_eq!(n.date, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
    }

    #[test]
    fn key_is_twenty_prefixed_for_valid_dates() {
        for (input, key) in [
            ("01-01-00", "2000-01-01"),
            ("31-12-99", "2099-12-31"),
            ("29-02-24", "2024-02-29"),
            ("15-08-47", "2047-08-15"),
        ] {
            let n = normalize(input).unwrap();
            assert_eq!(n.key, key);
            assert_ne!(n.label, INVALID_DATE_LABEL);
        }
    }

    #[test]
    fn single_digit_day_and_month_are_padded() {
        assert_eq!(normalize("5-3-26").unwrap().key, "2026-03-05");
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for input in [
            "",
            "No Date",
            "05-03",
            "05-03-26-01",
            "aa-03-26",
            "05-03-2026",
            "32-01-26",
            "31-04-26",
            "29-02-25",
            "00-01-26",
            "05-13-26",
            "05/03/26",
            "05-03-26, 06-03-26",
            "+5-03-26",
        ] {
            assert!(normalize(input).is_err(), "expected {:?} to be rejected", input);
        }
    }

    #[test]
    fn label_fallbacks() {
        assert_eq!(label_for(&Field::Missing), "No Date");
        assert_eq!(label_for(&Field::Present("31-02-26".to_string())), "Invalid Date");
        assert_eq!(
            label_for(&Field::Present("01-01-26".to_string())),
            "Thursday, 1 January, 2026"
        );
    }
}
