//! # Display Formatting Helpers
//!
//! Formatting used by every screen that shows wallet or telemetry values:
//! - [`format_amount`] - Money with thousands separators and 2 decimals
//! - [`format_currency`] - [`format_amount`] with a currency symbol
//! - [`format_energy`] - kWh below 1000, MWh above
//! - [`format_percentage`] - One decimal place
//! - [`format_reference`] / [`truncate_id`] - Shorten long identifiers
//!
//! ```rust
//! use shared::utils::{format_amount, format_energy};
//!
//! assert_eq!(format_amount(1234.5), "1,234.50");
//! assert_eq!(format_energy(1500.0), "1.50 MWh");
//! ```

/// Format a money amount with thousands separators and two decimals.
///
/// ```rust
/// use shared::utils::format_amount;
///
/// assert_eq!(format_amount(0.0), "0.00");
/// assert_eq!(format_amount(-1500.0), "-1,500.00");
/// ```
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // -0.001 rounds to "0.00" and must not render as "-0.00"
    let negative = amount < 0.0 && fixed != "0.00";
    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, fraction)
}

/// [`format_amount`] prefixed with `symbol`, sign first.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let formatted = format_amount(amount);
    match formatted.strip_prefix('-') {
        Some(rest) => format!("-{}{}", symbol, rest),
        None => format!("{}{}", symbol, formatted),
    }
}

/// Format an energy quantity given in kWh.
pub fn format_energy(kwh: f64) -> String {
    if kwh.abs() >= 1000.0 {
        format!("{:.2} MWh", kwh / 1000.0)
    } else {
        format!("{:.2} kWh", kwh)
    }
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Shorten an identifier to its first `prefix_len` and last `suffix_len`
/// characters.
///
/// If the identifier is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// ```rust
/// use shared::utils::format_reference;
///
/// assert_eq!(format_reference("TXN-20240501-8F3A9C2D", 4, 4), "TXN-...9C2D");
/// assert_eq!(format_reference("short", 4, 4), "short");
/// ```
pub fn format_reference(reference: &str, prefix_len: usize, suffix_len: usize) -> String {
    let chars: Vec<char> = reference.chars().collect();
    if chars.len() <= prefix_len + suffix_len {
        return reference.to_string();
    }

    let prefix: String = chars[..prefix_len].iter().collect();
    let suffix: String = chars[chars.len() - suffix_len..].iter().collect();
    format!("{}...{}", prefix, suffix)
}

/// [`format_reference`] with a 4-character prefix and suffix.
pub fn truncate_id(id: &str) -> String {
    format_reference(id, 4, 4)
}
