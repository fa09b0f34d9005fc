// src/period.rs
//
// DHIS2 period identifiers are plain strings built from a period-type code
// and a date. The server rejects malformed ones outright, so the templates
// here are a contract, not a convention. The period types are stable enough
// to hardcode; they could also be fetched through the API.

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};

/// Format `date` as the period identifier for `period_type` (the
/// `periodType` string a data set reports, e.g. "Monthly" → `202406`).
pub fn format_period(period_type: &str, date: NaiveDate) -> Result<String> {
    let (week_year, week) = week_from_date(date);
    let year = date.year();
    let month = date.month();

    let period = match period_type {
        "Daily" => format!("{year}{month:02}{day:02}", day = date.day()),
        "Weekly" => format!("{week_year}W{week}"),
        "WeeklyWednesday" => format!("{week_year}WedW{week}"),
        "WeeklyThursday" => format!("{week_year}ThuW{week}"),
        "WeeklySaturday" => format!("{week_year}SatW{week}"),
        "WeeklySunday" => format!("{week_year}SunW{week}"),
        "BiWeekly" => format!("{week_year}BiW{biweek}", biweek = (week + 1) / 2),
        "Monthly" => format!("{year}{month:02}"),
        "BiMonthly" => format!("{year}{month:02}B"),
        "Quarterly" => format!("{year}Q{quarter}", quarter = (month - 1) / 3 + 1),
        "SixMonthly" => format!("{year}S{half}", half = (month - 1) / 6 + 1),
        "SixMonthlyApril" => {
            // S1 runs April-September
            let half = if (4..=9).contains(&month) { 1 } else { 2 };
            format!("{year}AprilS{half}")
        }
        "SixMonthlyNovember" => {
            // S1 runs November-April
            let half = if (5..=10).contains(&month) { 2 } else { 1 };
            format!("{year}NovS{half}")
        }
        "Yearly" => format!("{year}"),
        "FinancialApril" => format!("{year}April"),
        "FinancialJuly" => format!("{year}July"),
        "FinancialOct" => format!("{year}Oct"),
        "FinancialNov" => format!("{year}Nov"),
        other => return Err(Error::UnknownPeriodType(other.to_string())),
    };
    Ok(period)
}

/// Week number for `date`, with week 1 starting on the Sunday on or before
/// January 1. Dates past the start of next year's week 1 roll over.
pub fn week_from_date(date: NaiveDate) -> (i32, u32) {
    let ordinal = date.num_days_from_ce();
    let mut year = date.year();
    let mut week = (ordinal - week1_start_ordinal(year)) / 7 + 1;
    if week >= 52 && ordinal >= week1_start_ordinal(year + 1) {
        year += 1;
        week = 1;
    }
    (year, week as u32)
}

fn week1_start_ordinal(year: i32) -> i32 {
    // NaiveDate::from_ymd_opt only fails outside chrono's year range
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid calendar date");
    let days_from_monday = jan1.weekday().num_days_from_monday() as i32;
    jan1.num_days_from_ce() - (days_from_monday + 1) % 7
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn calendar_periods() {
        let d = date(2024, 6, 25);
        assert_eq!(format_period("Daily", d).unwrap(), "20240625");
        assert_eq!(format_period("Monthly", d).unwrap(), "202406");
        assert_eq!(format_period("BiMonthly", d).unwrap(), "202406B");
        assert_eq!(format_period("Quarterly", d).unwrap(), "2024Q2");
        assert_eq!(format_period("SixMonthly", d).unwrap(), "2024S1");
        assert_eq!(format_period("SixMonthlyApril", d).unwrap(), "2024AprilS1");
        assert_eq!(format_period("Yearly", d).unwrap(), "2024");
        assert_eq!(format_period("FinancialJuly", d).unwrap(), "2024July");
    }

    #[test]
    fn monthly_is_zero_padded() {
        assert_eq!(format_period("Monthly", date(2024, 1, 5)).unwrap(), "202401");
    }

    #[test]
    fn weeks_start_on_sunday() {
        // Jan 1 2024 is a Monday, so 2024's week 1 starts Sunday Dec 31 2023
        // and that Sunday already rolls forward.
        assert_eq!(week_from_date(date(2023, 12, 31)), (2024, 1));
        assert_eq!(week_from_date(date(2024, 1, 1)), (2024, 1));
        assert_eq!(week_from_date(date(2024, 1, 6)), (2024, 1));
        assert_eq!(week_from_date(date(2024, 1, 7)), (2024, 2));
    }

    #[test]
    fn late_december_rolls_into_next_years_week_one() {
        // Dec 29 2024 is a Sunday, on/after the start of 2025's week 1.
        let (year, week) = week_from_date(date(2024, 12, 29));
        assert_eq!((year, week), (2025, 1));
        assert_eq!(
            format_period("Weekly", date(2024, 12, 29)).unwrap(),
            "2025W1"
        );
    }

    #[test]
    fn unknown_period_type_is_an_error() {
        assert!(matches!(
            format_period("Fortnightly", date(2024, 6, 25)),
            Err(Error::UnknownPeriodType(t)) if t == "Fortnightly"
        ));
    }
}
