//! Input validation shared by the request handlers.

use time::Date;
use unicode_segmentation::UnicodeSegmentation;

use crate::Error;

/// The largest amount accepted for any money field, 999 999.00 in cents.
pub const MAX_AMOUNT_CENTS: i64 = 99_999_900;

/// Trim `value` and check that it has between `min` and `max` graphemes.
///
/// Returns the trimmed string.
///
/// # Errors
///
/// Returns [Error::Validation] naming `field` if the length is out of range.
pub fn validate_text(field: &str, value: &str, min: usize, max: usize) -> Result<String, Error> {
    let value = value.trim();
    let length = value.graphemes(true).count();

    if length < min || length > max {
        return Err(Error::Validation(format!(
            "{field} must be between {min} and {max} characters long, got {length}"
        )));
    }

    Ok(value.to_owned())
}

/// Check that `cents` is within 0..=[MAX_AMOUNT_CENTS].
///
/// # Errors
///
/// Returns [Error::Validation] naming `field` if the amount is out of range.
pub fn validate_amount(field: &str, cents: i64) -> Result<i64, Error> {
    if !(0..=MAX_AMOUNT_CENTS).contains(&cents) {
        return Err(Error::Validation(format!(
            "{field} must be between 0 and {MAX_AMOUNT_CENTS} cents, got {cents}"
        )));
    }

    Ok(cents)
}

/// Check that an optional end date is not before the start date.
///
/// # Errors
///
/// Returns [Error::Validation] if `ends_on` is before `starts_on`.
pub fn validate_date_range(starts_on: Date, ends_on: Option<Date>) -> Result<(), Error> {
    match ends_on {
        Some(ends_on) if ends_on < starts_on => Err(Error::Validation(format!(
            "the end date {ends_on} must not be before the start date {starts_on}"
        ))),
        _ => Ok(()),
    }
}
