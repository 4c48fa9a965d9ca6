/// Parse a currency string such as `$3,200.50`.
///
/// Dollar signs, thousands separators and surrounding whitespace are
/// ignored. Anything that still does not parse counts as zero.
pub fn parse_amount(amount: &str) -> f64 {
    let cleaned: String = amount
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();

    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Format an amount the way invoices store it: `$2,400` or `$3,200.50`.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let remainder = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    if remainder == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{remainder:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_currency_strings() {
        assert_eq!(parse_amount("$2,400"), 2400.0);
        assert_eq!(parse_amount("$3,200.50"), 3200.5);
        assert_eq!(parse_amount(" 1800 "), 1800.0);
        assert_eq!(parse_amount("$1,000,000"), 1_000_000.0);
    }

    #[test]
    fn unparsable_amounts_are_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("$"), 0.0);
        assert_eq!(parse_amount("TBD"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
    }

    #[test]
    fn formats_with_separators() {
        assert_eq!(format_amount(2400.0), "$2,400");
        assert_eq!(format_amount(3200.5), "$3,200.50");
        assert_eq!(format_amount(5000.5), "$5,000.50");
        assert_eq!(format_amount(999.0), "$999");
        assert_eq!(format_amount(1_234_567.0), "$1,234,567");
        assert_eq!(format_amount(0.0), "$0");
        assert_eq!(format_amount(-12.25), "-$12.25");
    }
}
