//! # Shared Utility Functions
//!
//! Display helpers used by the client and its CLI.
//!
//! - [`format_coins`] - Coin amount with thousands separators
//! - [`abbreviate`] - Shorten long identifiers with an ellipsis
//!
//! ```rust
//! use shared::utils::{abbreviate, format_coins};
//!
//! assert_eq!(format_coins(15420.0), "15,420");
//! assert_eq!(abbreviate("0x5f3c9a8e7d6b", 4, 4), "0x5f...7d6b");
//! ```

/// Format a coin amount with `,` thousands separators.
///
/// Whole amounts print without a fractional part; fractional amounts keep up
/// to two decimals with trailing zeros removed.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_coins;
///
/// assert_eq!(format_coins(0.0), "0");
/// assert_eq!(format_coins(1250.0), "1,250");
/// assert_eq!(format_coins(-1234567.5), "-1,234,567.5");
/// ```
pub fn format_coins(amount: f64) -> String {
    let negative = amount < 0.0;
    let rendered = format!("{:.2}", amount.abs());
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let fraction = fraction.trim_end_matches('0');
    let mut out = String::new();
    if negative && (grouped != "0" || !fraction.is_empty()) {
        out.push('-');
    }
    out.push_str(&grouped);
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Shorten an identifier to its first `prefix_len` and last `suffix_len`
/// characters.
///
/// Identifiers that are not longer than `prefix_len + suffix_len` characters
/// are returned as-is. Counting is by `char`, so non-ASCII input never splits
/// a code point.
///
/// # Examples
///
/// ```rust
/// use shared::utils::abbreviate;
///
/// assert_eq!(abbreviate("coding-master-2025", 6, 4), "coding...2025");
/// assert_eq!(abbreviate("short", 4, 4), "short");
/// ```
pub fn abbreviate(id: &str, prefix_len: usize, suffix_len: usize) -> String {
    let len = id.chars().count();
    if len <= prefix_len + suffix_len {
        return id.to_string();
    }

    let prefix: String = id.chars().take(prefix_len).collect();
    let suffix: String = id.chars().skip(len - suffix_len).collect();

    format!("{}...{}", prefix, suffix)
}
