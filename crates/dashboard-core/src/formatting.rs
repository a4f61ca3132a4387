use crate::labels::Locale;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    format_with_separators(value, decimals, ',', '.')
}

/// Format an amount in euros using the separators of `locale`.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_euros;
/// use dashboard_core::labels::Locale;
///
/// assert_eq!(format_euros(1234.56, Locale::Es), "1.234,56 €");
/// assert_eq!(format_euros(1234.56, Locale::En), "€1,234.56");
/// assert_eq!(format_euros(-9.99, Locale::Es), "-9,99 €");
/// ```
pub fn format_euros(amount: f64, locale: Locale) -> String {
    match locale {
        Locale::Es => format!("{} €", format_with_separators(amount, 2, '.', ',')),
        Locale::En => {
            if amount < 0.0 {
                format!("-€{}", format_number(amount.abs(), 2))
            } else {
                format!("€{}", format_number(amount, 2))
            }
        }
    }
}

/// Format a row count using the thousands separator of `locale`.
pub fn format_count(count: usize, locale: Locale) -> String {
    match locale {
        Locale::Es => format_with_separators(count as f64, 0, '.', ','),
        Locale::En => format_number(count as f64, 0),
    }
}

/// Compact axis label for large values: `1.2k`, `3.4M`.
///
/// # Examples
///
/// ```
/// use dashboard_core::formatting::format_compact;
///
/// assert_eq!(format_compact(950.0), "950");
/// assert_eq!(format_compact(1_260.0), "1.3k");
/// assert_eq!(format_compact(-3_400_000.0), "-3.4M");
/// ```
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1_000_000.0 {
        format!("{sign}{:.1}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{sign}{:.1}k", abs / 1_000.0)
    } else {
        format!("{sign}{:.0}", abs)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn format_with_separators(value: f64, decimals: u32, thousands: char, decimal: char) -> String {
    // Handle the sign separately so the thousands grouping works on the
    // absolute value.
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Add a tiny epsilon (half ULP at the target precision) before rounding
    // to avoid IEEE 754 binary-representation issues at exact midpoints.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string(), thousands);

    let result = if decimals == 0 {
        grouped
    } else {
        // `frac_str` starts with "0.", e.g. "0.50".
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        format!("{}{}{}", grouped, decimal, &frac_str[2..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Insert `sep` every three digits from the right of an integer string.
fn group_thousands(s: &str, sep: char) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(sep);
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
