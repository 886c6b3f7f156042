//! Date and money normalization
//!
//! Pure helpers that turn icodrops-flavored text into canonical values:
//! raised-money strings into millions with two decimals, and the two date
//! shapes the site uses ("N days left" and "DD MONTHNAME") into `YYYY/MM/DD`.

use crate::ParseError;
use chrono::{Days, Local, NaiveDate};

const MILLION: f64 = 1_000_000.0;

/// Converts an icodrops money string (e.g. `"$3,274,277"`) into a number of
/// millions formatted with exactly two decimals (`"3.27"`).
///
/// Strips a leading `$` and digit-group commas before parsing. Returns `None`
/// for non-numeric input; callers map that to the `"pending"` sentinel.
pub fn parse_money_to_millions(text: &str) -> Option<String> {
    let cleaned = text.trim().trim_start_matches('$').replace(',', "");
    let amount: f64 = cleaned.parse().ok()?;
    Some(format!("{:.2}", amount / MILLION))
}

/// Formats a date as `YYYY/MM/DD` with zero-padded month and day.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Returns today's local date plus `days_left` days, formatted `YYYY/MM/DD`.
///
/// Used for active events, whose sale date is given as a days-left counter.
pub fn date_from_days_left(days_left: u64) -> String {
    format_date(Local::now().date_naive() + Days::new(days_left))
}

/// Builds a `YYYY/MM/DD` date from a full uppercase English month name.
///
/// The month name is case-sensitive (`"JANUARY"`..`"DECEMBER"`), matching
/// what the source site renders. An unrecognized name or an out-of-range day
/// is a `ParseError`.
pub fn date_from_month_name(year: i32, month_name: &str, day: u32) -> Result<String, ParseError> {
    let month = month_index(month_name)
        .ok_or_else(|| ParseError::UnrecognizedMonth(month_name.to_string()))?;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(ParseError::InvalidDate { year, month, day })?;
    Ok(format_date(date))
}

/// Maps a full uppercase English month name to its 1-12 index.
fn month_index(month_name: &str) -> Option<u32> {
    match month_name {
        "JANUARY" => Some(1),
        "FEBRUARY" => Some(2),
        "MARCH" => Some(3),
        "APRIL" => Some(4),
        "MAY" => Some(5),
        "JUNE" => Some(6),
        "JULY" => Some(7),
        "AUGUST" => Some(8),
        "SEPTEMBER" => Some(9),
        "OCTOBER" => Some(10),
        "NOVEMBER" => Some(11),
        "DECEMBER" => Some(12),
        _ => None,
    }
}

/// Infers the year for a newest-first run of ended events whose dates carry
/// no explicit year.
///
/// The walker tracks the previous item's month. When the new item's month
/// differs from the previous one AND the previous month was `"JANUARY"`, the
/// running year is decremented once: walking backward through time, the items
/// after a January entry belong to the previous calendar year. This assumes
/// the list is contiguous and monotonically non-increasing by date, so the
/// decrement fires exactly once per December->January boundary crossed.
#[derive(Debug)]
pub struct MonthWalker {
    year: i32,
    last_month: Option<String>,
}

impl MonthWalker {
    /// Creates a walker whose first item is assumed to fall in `start_year`.
    pub fn new(start_year: i32) -> Self {
        Self {
            year: start_year,
            last_month: None,
        }
    }

    /// The current running year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Dates the next item in list order, applying the rollover rule.
    ///
    /// On any parse failure the walker state is left untouched: a malformed
    /// item must neither consume a pending rollover nor become the
    /// remembered month, or its neighbors would shift by a year.
    pub fn date_for(&mut self, month_name: &str, day: u32) -> Result<String, ParseError> {
        let month = month_index(month_name)
            .ok_or_else(|| ParseError::UnrecognizedMonth(month_name.to_string()))?;
        let year = if self.last_month.as_deref() == Some("JANUARY") && month != 1 {
            self.year - 1
        } else {
            self.year
        };
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(ParseError::InvalidDate { year, month, day })?;
        self.year = year;
        self.last_month = Some(month_name.to_string());
        Ok(format_date(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_money_with_symbol_and_separators() {
        assert_eq!(parse_money_to_millions("$3,274,277"), Some("3.27".to_string()));
    }

    #[test]
    fn test_money_below_one_million() {
        assert_eq!(parse_money_to_millions("$950,000"), Some("0.95".to_string()));
    }

    #[test]
    fn test_money_rounds_to_two_decimals() {
        assert_eq!(parse_money_to_millions("$1,005,000"), Some("1.00".to_string()));
        assert_eq!(parse_money_to_millions("$12,345,678"), Some("12.35".to_string()));
    }

    #[test]
    fn test_money_without_symbol() {
        assert_eq!(parse_money_to_millions("2,000,000"), Some("2.00".to_string()));
    }

    #[test]
    fn test_money_unparseable() {
        assert_eq!(parse_money_to_millions("TBA"), None);
        assert_eq!(parse_money_to_millions(""), None);
        assert_eq!(parse_money_to_millions("$"), None);
    }

    #[test]
    fn test_format_date_zero_pads() {
        let date = NaiveDate::from_ymd_opt(2019, 8, 5).unwrap();
        assert_eq!(format_date(date), "2019/08/05");
    }

    #[test]
    fn test_date_from_days_left_today() {
        let today = Local::now().date_naive();
        assert_eq!(date_from_days_left(0), format_date(today));
    }

    #[test]
    fn test_date_from_days_left_thirty() {
        let expected = Local::now().date_naive() + Days::new(30);
        assert_eq!(date_from_days_left(30), format_date(expected));
    }

    #[test]
    fn test_date_from_month_name() {
        assert_eq!(
            date_from_month_name(2019, "AUGUST", 15).unwrap(),
            "2019/08/15"
        );
    }

    #[test]
    fn test_date_from_month_name_unrecognized() {
        let err = date_from_month_name(2019, "Aug", 15).unwrap_err();
        assert_eq!(err, ParseError::UnrecognizedMonth("Aug".to_string()));
    }

    #[test]
    fn test_date_from_month_name_invalid_day() {
        let err = date_from_month_name(2019, "FEBRUARY", 30).unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate { .. }));
    }

    #[test]
    fn test_walker_no_rollover_within_year() {
        // Newest-first: June, May, April of the same year.
        let mut walker = MonthWalker::new(2019);
        assert_eq!(walker.date_for("JUNE", 1).unwrap(), "2019/06/01");
        assert_eq!(walker.date_for("MAY", 20).unwrap(), "2019/05/20");
        assert_eq!(walker.date_for("APRIL", 10).unwrap(), "2019/04/10");
        assert_eq!(walker.year(), 2019);
    }

    #[test]
    fn test_walker_december_then_january_stays_in_year() {
        // December followed by January of the same year: walking backward
        // from December never crosses a year boundary into January.
        let mut walker = MonthWalker::new(2019);
        assert_eq!(walker.date_for("DECEMBER", 28).unwrap(), "2019/12/28");
        assert_eq!(walker.date_for("JANUARY", 3).unwrap(), "2019/01/03");
        assert_eq!(walker.year(), 2019);
    }

    #[test]
    fn test_walker_january_then_december_rolls_back() {
        // Leaving a January item while walking backward through time crosses
        // into December of the previous year.
        let mut walker = MonthWalker::new(2019);
        assert_eq!(walker.date_for("JANUARY", 3).unwrap(), "2019/01/03");
        assert_eq!(walker.date_for("DECEMBER", 28).unwrap(), "2018/12/28");
        assert_eq!(walker.year(), 2018);
    }

    #[test]
    fn test_walker_consecutive_januaries_roll_back_once() {
        let mut walker = MonthWalker::new(2019);
        assert_eq!(walker.date_for("JANUARY", 30).unwrap(), "2019/01/30");
        assert_eq!(walker.date_for("JANUARY", 2).unwrap(), "2019/01/02");
        assert_eq!(walker.date_for("DECEMBER", 25).unwrap(), "2018/12/25");
    }

    #[test]
    fn test_walker_two_boundaries() {
        let mut walker = MonthWalker::new(2019);
        assert_eq!(walker.date_for("FEBRUARY", 14).unwrap(), "2019/02/14");
        assert_eq!(walker.date_for("JANUARY", 5).unwrap(), "2019/01/05");
        assert_eq!(walker.date_for("NOVEMBER", 30).unwrap(), "2018/11/30");
        assert_eq!(walker.date_for("JANUARY", 12).unwrap(), "2018/01/12");
        assert_eq!(walker.date_for("DECEMBER", 1).unwrap(), "2017/12/01");
        assert_eq!(walker.year(), 2017);
    }

    #[test]
    fn test_walker_invalid_day_leaves_state_untouched() {
        // An out-of-range day after a January item must not consume the
        // pending rollover: the next valid item rolls back exactly once,
        // not twice.
        let mut walker = MonthWalker::new(2019);
        assert_eq!(walker.date_for("JANUARY", 3).unwrap(), "2019/01/03");
        assert!(matches!(
            walker.date_for("DECEMBER", 32),
            Err(ParseError::InvalidDate { .. })
        ));
        assert_eq!(walker.year(), 2019);
        assert_eq!(walker.date_for("DECEMBER", 28).unwrap(), "2018/12/28");
        assert_eq!(walker.year(), 2018);
    }

    #[test]
    fn test_walker_bad_month_leaves_state_untouched() {
        let mut walker = MonthWalker::new(2019);
        walker.date_for("JANUARY", 3).unwrap();
        assert!(walker.date_for("SMARCH", 1).is_err());
        // The failed item neither consumed the pending rollover nor became
        // the remembered month.
        assert_eq!(walker.year(), 2019);
        assert_eq!(walker.date_for("DECEMBER", 28).unwrap(), "2018/12/28");
    }

    #[test]
    fn test_walker_starts_from_given_year() {
        let this_year = Local::now().year();
        let mut walker = MonthWalker::new(this_year);
        assert_eq!(
            walker.date_for("MAY", 1).unwrap(),
            format!("{}/05/01", this_year)
        );
    }
}
