use crate::extract::dialect::{CURRENCY_SYMBOL, NBSP_MARKER, TIME_DELIMITER};

/// Turn a displayed amount (`" 768,50 € "`, `"€56,09&nbsp;"`) into a number.
///
/// Text without any digit yields `NaN`; callers that need a real amount
/// must check for it.
pub fn sanitize_price(raw: &str) -> f64 {
    let cleaned = raw
        .replace(CURRENCY_SYMBOL, "")
        .replace(NBSP_MARKER, "")
        .replace('\u{a0}', "")
        .replace(',', ".");
    let cleaned = cleaned.trim();

    if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return f64::NAN;
    }
    cleaned.parse().unwrap_or(f64::NAN)
}

/// `16h37` → `16:37`. Only the first delimiter is replaced.
pub fn replace_time_delimiter(value: &str) -> String {
    value.replacen(TIME_DELIMITER, ":", 1)
}
