//! Currency and percentage formatting for display.
//!
//! Output follows en-US conventions: comma thousands separators, a leading
//! minus sign and the currency symbol directly before the digits.

/// Display prefix for a currency code (already upper-cased)
fn currency_prefix(code: &str) -> String {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "AUD" => "A$",
        "CAD" => "CA$",
        "INR" => "₹",
        _ => return format!("{} ", code),
    };
    symbol.to_string()
}

/// Inserts thousands separators into a run of ASCII digits.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a non-negative amount with `max_fraction` digits, trimming
/// trailing zeros down to two fraction digits.
fn format_number(amount: f64, max_fraction: usize) -> String {
    let formatted = format!("{:.1$}", amount, max_fraction);
    let (integer, fraction) = formatted.split_once('.').unwrap_or((&formatted, ""));

    let mut fraction = fraction.to_string();
    while fraction.len() > 2 && fraction.ends_with('0') {
        fraction.pop();
    }
    while fraction.len() < 2 {
        fraction.push('0');
    }

    format!("{}.{}", group_thousands(integer), fraction)
}

/// Formats an amount as a currency string.
///
/// Amounts of one unit or more get exactly two fraction digits; smaller
/// amounts get up to eight so low-priced assets do not collapse to `0.00`.
///
/// ```
/// use crypto_dashboard::format::format_currency;
///
/// assert_eq!(format_currency(1234.5, "usd"), "$1,234.50");
/// assert_eq!(format_currency(0.00012345, "usd"), "$0.00012345");
/// ```
pub fn format_currency(amount: f64, currency: &str) -> String {
    let code = currency.to_uppercase();
    let max_fraction = if amount < 1.0 { 8 } else { 2 };
    let number = format_number(amount.abs(), max_fraction);

    // A value that rounds to zero is shown unsigned
    let negative = amount < 0.0 && number.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };

    format!("{}{}{}", sign, currency_prefix(&code), number)
}

/// Renders a 24h change as an arrow and an absolute percentage.
pub fn format_percent_change(change: f64) -> String {
    let arrow = if change >= 0.0 { '↗' } else { '↘' };
    format!("{} {:.2}%", arrow, change.abs())
}

/// Renders a share such as market dominance.
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_fraction_digits_at_or_above_one() {
        assert_eq!(format_currency(1234.5, "usd"), "$1,234.50");
        assert_eq!(format_currency(1.0, "usd"), "$1.00");
        assert_eq!(format_currency(67000.456, "usd"), "$67,000.46");
    }

    #[test]
    fn test_extended_precision_below_one() {
        assert_eq!(format_currency(0.5, "usd"), "$0.50");
        assert_eq!(format_currency(0.00012345, "usd"), "$0.00012345");
        assert_eq!(format_currency(0.123456789, "usd"), "$0.12345679");
        assert_eq!(format_currency(0.0, "usd"), "$0.00");
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(format_currency(2_450_000_000_000.0, "usd"), "$2,450,000,000,000.00");
        assert_eq!(format_currency(999.0, "usd"), "$999.00");
        assert_eq!(format_currency(100_000.0, "usd"), "$100,000.00");
    }

    #[test]
    fn test_currency_code_is_upper_cased() {
        assert_eq!(format_currency(10.0, "EUR"), "€10.00");
        assert_eq!(format_currency(10.0, "eur"), "€10.00");
        assert_eq!(format_currency(1500.0, "gbp"), "£1,500.00");
        assert_eq!(format_currency(0.25, "btc"), "BTC 0.25");
        assert_eq!(format_currency(3.0, "xyz"), "XYZ 3.00");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_currency(-1234.5, "usd"), "-$1,234.50");
        assert_eq!(format_currency(-0.000000001, "usd"), "$0.00");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(format_currency(42.4242, "jpy"), format_currency(42.4242, "jpy"));
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(format_percent_change(2.346), "↗ 2.35%");
        assert_eq!(format_percent_change(0.0), "↗ 0.00%");
        assert_eq!(format_percent_change(-1.5), "↘ 1.50%");
        assert_eq!(format_percentage(52.1), "52.10%");
    }
}
