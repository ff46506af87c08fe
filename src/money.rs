//! Conversions between integer cents and major currency units.
//!
//! Money is stored and summed as `i64` cents everywhere in the application.
//! These helpers are the only place where cents are converted to and from
//! floating point or text, so there is exactly one rounding policy.

/// The currency code appended to formatted amounts.
pub const CURRENCY_CODE: &str = "PLN";

/// The number of decimal places [format_percentage] uses by default.
pub const DEFAULT_PERCENTAGE_DECIMALS: usize = 1;

/// Convert cents to major currency units, e.g. `12345` to `123.45`.
pub fn cents_to_major(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Convert an amount in major currency units to cents, rounding to the
/// nearest cent.
pub fn major_to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Format cents as a fixed two decimal string with the currency code, e.g.
/// `"123.45 PLN"`.
///
/// The string is built from the integer directly, so no precision is lost
/// for large amounts.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();

    format!("{sign}{}.{:02} {CURRENCY_CODE}", abs / 100, abs % 100)
}

/// Parse user input such as `"123.45"` or `"123,45"` into cents.
///
/// Returns `None` if the input is empty, not a number, or negative.
/// Digits after the second decimal place are rounded half away from zero.
pub fn parse_amount_to_cents(input: &str) -> Option<i64> {
    let normalized = input.trim().replacen(',', ".", 1);

    if normalized.is_empty() || normalized.starts_with('-') {
        return None;
    }

    let normalized = normalized.strip_prefix('+').unwrap_or(&normalized);

    let (whole, fraction) = match normalized.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (normalized, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole_cents = if whole.is_empty() {
        0
    } else {
        whole.parse::<i64>().ok()?.checked_mul(100)?
    };

    let mut fraction_digits = fraction.bytes().map(|digit| i64::from(digit - b'0'));
    let tenths = fraction_digits.next().unwrap_or(0);
    let hundredths = fraction_digits.next().unwrap_or(0);
    let round_up = fraction_digits.next().is_some_and(|digit| digit >= 5);

    whole_cents
        .checked_add(tenths * 10 + hundredths)?
        .checked_add(i64::from(round_up))
}

/// Calculate `part` as a percentage of `total`.
///
/// Returns zero when `total` is zero.
pub fn calculate_percentage(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }

    part / total * 100.0
}

/// Format a percentage with `decimals` decimal places, e.g. `"12.3%"`.
pub fn format_percentage(percentage: f64, decimals: usize) -> String {
    format!("{percentage:.decimals$}%")
}
