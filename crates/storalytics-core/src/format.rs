//! Number formatting for capacity and percentage cells.

/// Rendered form of any value that cannot be formatted as a number.
pub const ZERO_DISPLAY: &str = "0.00";

/// Format a magnitude with two decimals and `,` thousands grouping.
///
/// Non-finite input renders as [`ZERO_DISPLAY`].
#[must_use]
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return ZERO_DISPLAY.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = group_thousands(whole);
    let negative = value.is_sign_negative() && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    if negative {
        format!("-{grouped}.{fraction}")
    } else {
        format!("{grouped}.{fraction}")
    }
}

/// Parse a textual number and format it like [`format_amount`].
///
/// Input that does not parse renders as [`ZERO_DISPLAY`].
#[must_use]
pub fn format_amount_str(value: &str) -> String {
    value
        .trim()
        .parse::<f64>()
        .map_or_else(|_| ZERO_DISPLAY.to_string(), format_amount)
}

/// Format a `[0, 1]` ratio as a percentage magnitude (no `%` sign).
#[must_use]
pub fn format_percent(ratio: f64) -> String {
    format_amount(ratio * 100.0)
}

/// One-decimal percentage of `value` within `total`; `0.0` for an empty total.
#[must_use]
pub fn share_percent(value: f64, total: f64) -> f64 {
    if total > 0.0 && value.is_finite() {
        value / total * 100.0
    } else {
        0.0
    }
}

/// Render a share percentage with one decimal (`12.3`).
#[must_use]
pub fn format_share(percent: f64) -> String {
    format!("{percent:.1}")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_use_two_decimals_and_grouping() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(5.0), "5.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(1_234.5), "1,234.50");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(100_000.0), "100,000.00");
    }

    #[test]
    fn negative_amounts_keep_sign_unless_rounded_to_zero() {
        assert_eq!(format_amount(-1_500.25), "-1,500.25");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn non_numeric_input_formats_as_zero() {
        assert_eq!(format_amount(f64::NAN), ZERO_DISPLAY);
        assert_eq!(format_amount(f64::INFINITY), ZERO_DISPLAY);
        assert_eq!(format_amount_str("abc"), ZERO_DISPLAY);
        assert_eq!(format_amount_str(""), ZERO_DISPLAY);
        assert_eq!(format_amount_str(" 42.5 "), "42.50");
    }

    #[test]
    fn percent_scales_ratio() {
        assert_eq!(format_percent(0.5647), "56.47");
        assert_eq!(format_percent(1.0), "100.00");
    }

    #[test]
    fn share_handles_empty_totals() {
        assert!((share_percent(25.0, 100.0) - 25.0).abs() < f64::EPSILON);
        assert!(share_percent(5.0, 0.0).abs() < f64::EPSILON);
        assert_eq!(format_share(share_percent(1.0, 3.0)), "33.3");
    }
}
