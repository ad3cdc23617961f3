//! A calendar month, written `YYYY-MM`.

use std::{cmp::Ordering, fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Month};

use crate::Error;

/// A calendar month in a specific year.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    /// Create a new year-month.
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month containing `date`.
    pub fn from_date(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month.
    pub fn month(&self) -> Month {
        self.month
    }

    /// The month before this one, wrapping into the previous year after January.
    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self::new(self.year - 1, Month::December),
            month => Self::new(self.year, month.previous()),
        }
    }

    /// The month `n` months before this one.
    pub fn minus_months(self, n: u32) -> Self {
        (0..n).fold(self, |month, _| month.previous())
    }

    /// The first day of the month.
    pub fn first_day(self) -> Date {
        // Day 1 exists in every month of every year in the `time` crate's range.
        Date::from_calendar_date(self.year, self.month, 1).unwrap_or(Date::MIN)
    }

    /// The number of days in the month.
    pub fn length(self) -> u8 {
        self.month.length(self.year)
    }

    /// Whether `date` falls in this month.
    pub fn contains(self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The three letter English name of the month, e.g. "Jan".
    pub fn short_name(self) -> &'static str {
        match self.month {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
    }
}

impl Ord for YearMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, u8::from(self.month)).cmp(&(other.year, u8::from(other.month)))
    }
}

impl PartialOrd for YearMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_owned());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;

        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Ok(Self::new(year, month))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl ToSql for YearMonth {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for YearMonth {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::{Error, YearMonth};

    #[test]
    fn displays_with_zero_padding() {
        let month = YearMonth::new(2025, Month::March);

        assert_eq!(month.to_string(), "2025-03");
    }

    #[test]
    fn parses_valid_month() {
        assert_eq!(
            "2024-12".parse::<YearMonth>(),
            Ok(YearMonth::new(2024, Month::December))
        );
    }

    #[test]
    fn rejects_out_of_range_month_numbers() {
        for text in ["2024-00", "2024-13"] {
            assert_eq!(
                text.parse::<YearMonth>(),
                Err(Error::InvalidMonth(text.to_owned()))
            );
        }
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["2024", "2024-1", "24-01", "2024/01", "abcd-ef", "2024-01-01"] {
            assert!(text.parse::<YearMonth>().is_err(), "{text} should not parse");
        }
    }

    #[test]
    fn previous_wraps_to_december() {
        let month = YearMonth::new(2025, Month::January);

        assert_eq!(month.previous(), YearMonth::new(2024, Month::December));
    }

    #[test]
    fn minus_months_crosses_years() {
        let month = YearMonth::new(2025, Month::February);

        assert_eq!(month.minus_months(7), YearMonth::new(2024, Month::July));
        assert_eq!(month.minus_months(0), month);
    }

    #[test]
    fn length_accounts_for_leap_years() {
        assert_eq!(YearMonth::new(2024, Month::February).length(), 29);
        assert_eq!(YearMonth::new(2025, Month::February).length(), 28);
        assert_eq!(YearMonth::new(1900, Month::February).length(), 28);
        assert_eq!(YearMonth::new(2025, Month::April).length(), 30);
        assert_eq!(YearMonth::new(2025, Month::December).length(), 31);
    }

    #[test]
    fn contains_only_dates_in_the_month() {
        let month = YearMonth::from_date(date!(2025 - 06 - 15));

        assert!(month.contains(date!(2025 - 06 - 01)));
        assert!(month.contains(date!(2025 - 06 - 30)));
        assert!(!month.contains(date!(2025 - 07 - 01)));
        assert!(!month.contains(date!(2024 - 06 - 15)));
    }

    #[test]
    fn serializes_as_string() {
        let month = YearMonth::new(2025, Month::October);

        let json = serde_json::to_string(&month).unwrap();

        assert_eq!(json, "\"2025-10\"");
        assert_eq!(serde_json::from_str::<YearMonth>(&json).unwrap(), month);
    }

    #[test]
    fn orders_chronologically() {
        assert!(YearMonth::new(2024, Month::December) < YearMonth::new(2025, Month::January));
    }
}
