//! The calendar month identifier used for budget months, e.g. "2025-10".

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, Month, util::days_in_year_month};

use crate::Error;

/// A validated calendar month in the format "YYYY-MM".
///
/// The first and last day of the month are computed once on construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    first_day: Date,
    last_day: Date,
}

impl MonthKey {
    /// Create a month key from a year and a month.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidMonth] if `year` is outside 0..=9999.
    pub fn new(year: i32, month: Month) -> Result<Self, Error> {
        let invalid = || Error::InvalidMonth(format!("{year:04}-{:02}", month as u8));

        if !(0..=9999).contains(&year) {
            return Err(invalid());
        }

        let first_day = Date::from_calendar_date(year, month, 1).map_err(|_| invalid())?;
        let last_day = Date::from_calendar_date(year, month, days_in_year_month(year, month))
            .map_err(|_| invalid())?;

        Ok(Self {
            first_day,
            last_day,
        })
    }

    /// The month that contains `date`.
    pub fn containing(date: Date) -> Result<Self, Error> {
        Self::new(date.year(), date.month())
    }

    /// The twelve months of `year` in calendar order.
    pub fn months_of_year(year: i32) -> Result<Vec<Self>, Error> {
        let mut month = Month::January;
        let mut months = Vec::with_capacity(12);

        for _ in 0..12 {
            months.push(Self::new(year, month)?);
            month = month.next();
        }

        Ok(months)
    }

    /// The first day of the month.
    pub fn first_day(&self) -> Date {
        self.first_day
    }

    /// The last day of the month.
    pub fn last_day(&self) -> Date {
        self.last_day
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// The month of the year, 1 for January through 12 for December.
    pub fn month_number(&self) -> u8 {
        self.first_day.month() as u8
    }

    /// The English name of the month, e.g. "January".
    pub fn month_name(&self) -> &'static str {
        match self.first_day.month() {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_owned());
        let bytes = s.as_bytes();

        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);

        if !well_formed {
            return Err(invalid());
        }

        let year: i32 = s[..4].parse().map_err(|_| invalid())?;
        let month: u8 = s[5..].parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Self::new(year, month)
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month_number())
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl ToSql for MonthKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for MonthKey {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod month_key_tests {
    use time::macros::date;

    use crate::{Error, month::MonthKey};

    #[test]
    fn parses_valid_month() {
        let month: MonthKey = "2024-03".parse().unwrap();

        assert_eq!(month.year(), 2024);
        assert_eq!(month.month_number(), 3);
        assert_eq!(month.first_day(), date!(2024 - 03 - 01));
        assert_eq!(month.last_day(), date!(2024 - 03 - 31));
        assert_eq!(month.to_string(), "2024-03");
    }

    #[test]
    fn last_day_handles_leap_years() {
        let leap: MonthKey = "2024-02".parse().unwrap();
        let common: MonthKey = "2023-02".parse().unwrap();

        assert_eq!(leap.last_day(), date!(2024 - 02 - 29));
        assert_eq!(common.last_day(), date!(2023 - 02 - 28));
    }

    #[test]
    fn rejects_malformed_months() {
        for input in ["2024-3", "24-03", "2024/03", "2024-13", "2024-00", "abcd-ef", "", "2024-03-01", " 2024-03"] {
            assert_eq!(
                input.parse::<MonthKey>(),
                Err(Error::InvalidMonth(input.to_owned())),
                "input = {input:?}"
            );
        }
    }

    #[test]
    fn months_of_year_are_in_order() {
        let months = MonthKey::months_of_year(2025).unwrap();

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].to_string(), "2025-01");
        assert_eq!(months[11].to_string(), "2025-12");
        assert_eq!(months[9].month_name(), "October");
    }

    #[test]
    fn serializes_as_string() {
        let month: MonthKey = "2025-10".parse().unwrap();

        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2025-10\"");
        assert_eq!(
            serde_json::from_str::<MonthKey>("\"2025-10\"").unwrap(),
            month
        );
        assert!(serde_json::from_str::<MonthKey>("\"2025-1\"").is_err());
    }
}
