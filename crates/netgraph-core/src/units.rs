//! Engineering-notation value parsing.

/// Multiplier for a single-letter engineering suffix (femto through tera).
///
/// The table is case-sensitive: `m` is milli while `M` is mega.
fn suffix_multiplier(suffix: &str) -> Option<f64> {
    match suffix {
        "f" => Some(1e-15),
        "p" => Some(1e-12),
        "n" => Some(1e-9),
        "u" => Some(1e-6),
        "m" => Some(1e-3),
        "k" => Some(1e3),
        "M" => Some(1e6),
        "G" => Some(1e9),
        "T" => Some(1e12),
        _ => None,
    }
}

/// Parse a numeric literal with an optional engineering suffix.
///
/// The leading signed decimal (optionally with an exponent) is extracted
/// first; whatever trails it is treated as the suffix. A suffix missing
/// from the multiplier table is ignored and the numeric prefix kept, so
/// `"5x"` parses as `5.0`. Returns `None` when no numeric prefix exists.
pub fn parse_raw(s: &str) -> Option<f64> {
    let s = s.trim();
    let chars: Vec<(usize, char)> = s.char_indices().collect();

    let mut pos = 0;
    if matches!(chars.first(), Some((_, '+')) | Some((_, '-'))) {
        pos += 1;
    }

    let digits_start = pos;
    while pos < chars.len() && (chars[pos].1.is_ascii_digit() || chars[pos].1 == '.') {
        pos += 1;
    }
    if pos == digits_start {
        return None;
    }

    // Optional exponent; only consumed when at least one digit follows.
    if pos < chars.len() && matches!(chars[pos].1, 'e' | 'E') {
        let mut exp_pos = pos + 1;
        if exp_pos < chars.len() && matches!(chars[exp_pos].1, '+' | '-') {
            exp_pos += 1;
        }
        let exp_digits = exp_pos;
        while exp_pos < chars.len() && chars[exp_pos].1.is_ascii_digit() {
            exp_pos += 1;
        }
        if exp_pos > exp_digits {
            pos = exp_pos;
        }
    }

    let split = if pos < chars.len() { chars[pos].0 } else { s.len() };
    let (num_str, suffix) = s.split_at(split);
    let value: f64 = num_str.parse().ok()?;

    match suffix_multiplier(suffix) {
        Some(mult) => Some(value * mult),
        None => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|v| (v - b).abs() < b.abs() * 1e-10 + 1e-20)
    }

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(parse_raw("5"), Some(5.0));
        assert_eq!(parse_raw("-2.5"), Some(-2.5));
        assert_eq!(parse_raw("1e-3"), Some(1e-3));
        assert_eq!(parse_raw("1.5E6"), Some(1.5e6));
    }

    #[test]
    fn test_parse_with_suffix() {
        assert!(approx_eq(parse_raw("10n"), 1e-8));
        assert!(approx_eq(parse_raw("2.2k"), 2200.0));
        assert!(approx_eq(parse_raw("100f"), 100e-15));
        assert!(approx_eq(parse_raw("1u"), 1e-6));
        assert!(approx_eq(parse_raw("3M"), 3e6));
        assert!(approx_eq(parse_raw("3m"), 3e-3));
    }

    #[test]
    fn test_unrecognized_suffix_ignored() {
        assert_eq!(parse_raw("5x"), Some(5.0));
        assert_eq!(parse_raw("10nF"), Some(10.0));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_raw("abc"), None);
        assert_eq!(parse_raw(""), None);
        assert_eq!(parse_raw("-"), None);
        assert_eq!(parse_raw("e3"), None);
    }

    #[test]
    fn test_exponent_without_digits_is_suffix() {
        // "2e" has no exponent digits, so "e" falls through as a suffix.
        assert_eq!(parse_raw("2e"), Some(2.0));
    }
}
