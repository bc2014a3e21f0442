/// Insert thousands separators into a non-negative whole-dollar amount
fn group_thousands(dollars: u64) -> String {
    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format a dollar amount with cents, e.g. `$1,393,600.00`
pub fn format_currency(value: f64) -> String {
    let cents_total = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents_total > 0 { "-" } else { "" };
    format!(
        "{sign}${}.{:02}",
        group_thousands(cents_total / 100),
        cents_total % 100
    )
}

/// Format a dollar amount rounded to whole dollars, e.g. `$60,800`
pub fn format_currency_short(value: f64) -> String {
    let dollars = value.abs().round() as u64;
    let sign = if value < 0.0 && dollars > 0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(dollars))
}

/// Format a dollar amount in compact form (e.g., $2.1M, $450K, $50)
pub fn format_compact_currency(value: f64) -> String {
    let abs_value = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs_value >= 1_000_000.0 {
        format!("{}${:.1}M", sign, abs_value / 1_000_000.0)
    } else if abs_value >= 1_000.0 {
        format!("{}${:.0}K", sign, abs_value / 1_000.0)
    } else {
        format!("{}${:.0}", sign, abs_value)
    }
}

/// Format a value already expressed in percent (0-100)
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Format a percent change with an explicit sign
pub fn format_signed_percent(value: f64) -> String {
    format!("{value:+.1}%")
}

/// Format a coverage ratio, e.g. `22.92×`
pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}×")
}
