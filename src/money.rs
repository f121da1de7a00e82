//! Rupee amounts as the UI shows them.

pub const CURRENCY_SYMBOL: char = '₹';

/// Renders `value` with at most two fraction digits, trailing zeros dropped.
pub fn format_plain(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Formats an amount as `₹` plus Indian digit grouping: `114900.0` becomes
/// `₹1,14,900`.
pub fn format_inr(value: f64) -> String {
    let plain = format_plain(value.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let grouped = group_indian(int_part);
    let sign = if value < 0.0 && plain != "0" { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{sign}{CURRENCY_SYMBOL}{grouped}.{frac}"),
        None => format!("{sign}{CURRENCY_SYMBOL}{grouped}"),
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Parses a displayed amount such as `₹1,14,900` or a bare `930.50`.
pub fn parse_amount(input: &str) -> Option<f64> {
    let cleaned: String = input
        .chars()
        .filter(|c| *c != CURRENCY_SYMBOL && *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_inr_groups_indian_style() {
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(7995.0), "₹7,995");
        assert_eq!(format_inr(58999.0), "₹58,999");
        assert_eq!(format_inr(114900.0), "₹1,14,900");
        assert_eq!(format_inr(12345678.0), "₹1,23,45,678");
    }

    #[test]
    fn test_format_inr_keeps_fraction() {
        assert_eq!(format_inr(930.5), "₹930.5");
        assert_eq!(format_inr(1250.25), "₹1,250.25");
        assert_eq!(format_inr(0.0), "₹0");
    }

    #[test]
    fn test_format_inr_negative() {
        assert_eq!(format_inr(-1500.0), "-₹1,500");
    }

    #[test]
    fn test_format_plain() {
        assert_eq!(format_plain(12500.0), "12500");
        assert_eq!(format_plain(930.5), "930.5");
        assert_eq!(format_plain(0.126), "0.13");
        assert_eq!(format_plain(100.0), "100");
    }

    #[test]
    fn test_parse_amount_strips_every_grouping_comma() {
        assert_eq!(parse_amount("₹1,14,900"), Some(114900.0));
        assert_eq!(parse_amount("₹58,999"), Some(58999.0));
        assert_eq!(parse_amount(" 930.50 "), Some(930.5));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("₹"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("NaN"), None);
    }
}
