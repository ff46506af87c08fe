//! Serializes a [Date] as "YYYY-MM-DD".
//!
//! Without the `serde-human-readable` feature `time` writes dates as a
//! (year, ordinal) tuple, which is not what API clients expect.

use serde::{Deserialize, Deserializer, Serializer};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Date::parse(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
}

/// The same format for an optional date, `null` when absent.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::DATE_FORMAT;

    pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => super::serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| Date::parse(&s, DATE_FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Reads a PATCH date field where `null` clears the date, see [crate::nullable].
pub mod nullable {
    use serde::{Deserialize, Deserializer};
    use time::Date;

    #[derive(Deserialize)]
    struct IsoDate(#[serde(with = "super")] Date);

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<Date>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        crate::nullable::deserialize::<IsoDate, D>(deserializer)
            .map(|date| date.map(|date| date.map(|IsoDate(date)| date)))
    }
}
