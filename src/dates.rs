// src/dates.rs

use chrono::NaiveDate;

/// Date formats tried in order; the first that parses wins. The order is
/// load-bearing: `%d/%m/%Y` before `%m/%d/%Y` would change which way an
/// ambiguous two-digit date resolves, so do not reorder.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%Y/%m/%d",
];

/// Reformat `text` as `YYYY-MM-DD` if it matches any known date format,
/// else `None`.
pub fn try_parse_date(text: &str) -> Option<String> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_passes_through() {
        assert_eq!(try_parse_date("2024-06-25").as_deref(), Some("2024-06-25"));
    }

    #[test]
    fn slashed_date_resolves_month_first_per_pattern_order() {
        // 25 can only be a day, so %m/%d/%Y fails and %d/%m/%Y matches.
        assert_eq!(try_parse_date("25/06/2024").as_deref(), Some("2024-06-25"));
        // Both readings are valid here; %m/%d/%Y is tried first and wins.
        assert_eq!(try_parse_date("05/06/2024").as_deref(), Some("2024-05-06"));
    }

    #[test]
    fn long_month_formats() {
        assert_eq!(
            try_parse_date("June 25, 2024").as_deref(),
            Some("2024-06-25")
        );
        assert_eq!(
            try_parse_date("25 June 2024").as_deref(),
            Some("2024-06-25")
        );
    }

    #[test]
    fn non_dates_return_none() {
        assert_eq!(try_parse_date("not a date"), None);
        assert_eq!(try_parse_date(""), None);
        assert_eq!(try_parse_date("2024-13-40"), None);
    }
}
