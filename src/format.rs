//! Number formatting in the ru-RU style the reports are written in:
//! no-break-space grouping, comma decimals, trailing zeros trimmed.

const NBSP: char = '\u{a0}';

/// `1234567.891` with two fraction digits → `1 234 567,89`.
pub fn format_number(value: f64, max_fraction_digits: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = format!("{:.*}", max_fraction_digits, value.abs());
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (rounded.as_str(), ""),
    };

    let mut out = String::new();
    let negative = value < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0');
    if negative {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(NBSP);
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

/// Share given as a fraction: `0.62` → `62 %`.
pub fn format_percent(fraction: f64) -> String {
    format!("{}{NBSP}%", format_number(fraction * 100.0, 1))
}

/// Whole US dollars: `1200` → `1 200 $`.
pub fn format_usd(value: f64) -> String {
    format!("{}{NBSP}$", format_number(value, 0))
}

pub fn format_optional_usd(value: Option<f64>) -> String {
    value.map(format_usd).unwrap_or_else(|| "—".to_string())
}

/// One block character per value, scaled between the series min and max.
pub fn sparkline(values: &[f64]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    values
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                ' '
            } else if max > min {
                BARS[(((v - min) / (max - min)) * 7.0).round() as usize]
            } else {
                BARS[3]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number(1234567.0, 0), "1\u{a0}234\u{a0}567");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1000.0, 0), "1\u{a0}000");
    }

    #[test]
    fn trims_fraction_zeros() {
        assert_eq!(format_number(12.5, 2), "12,5");
        assert_eq!(format_number(12.0, 2), "12");
        assert_eq!(format_number(-0.04, 1), "0");
        assert_eq!(format_number(-3.27, 1), "-3,3");
    }

    #[test]
    fn percent_and_currency() {
        assert_eq!(format_percent(0.62), "62\u{a0}%");
        assert_eq!(format_percent(0.153), "15,3\u{a0}%");
        assert_eq!(format_usd(1200.0), "1\u{a0}200\u{a0}$");
        assert_eq!(format_optional_usd(None), "—");
        assert_eq!(format_number(f64::NAN, 1), "-");
    }

    #[test]
    fn sparkline_spans_min_to_max() {
        assert_eq!(sparkline(&[1.0, 5.0, 3.0]), "▁█▅");
        assert_eq!(sparkline(&[2.0, 2.0]), "▄▄");
        assert_eq!(sparkline(&[]), "");
        assert_eq!(sparkline(&[1.0, f64::NAN, 2.0]), "▁ █");
    }
}
