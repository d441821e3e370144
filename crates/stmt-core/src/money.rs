//! Monetary value parsing and formatting.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount string, tolerating currency markers, thousands commas,
/// parentheses, and the "Nil" placeholder (and its common misspellings).
/// Returns the unsigned magnitude; sign handling belongs to the caller.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    if matches!(lower.as_str(), "nil" | "nill" | "nil.") {
        return Some(Decimal::ZERO);
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

/// Parse a balance string carrying an optional DR/CR suffix.
/// Returns the signed balance: DR is negative, CR (or no suffix) positive.
pub fn parse_signed_balance(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    let upper = trimmed.to_uppercase();
    let (body, is_debit) = if let Some(rest) = upper.strip_suffix("DR") {
        (rest, true)
    } else if let Some(rest) = upper.strip_suffix("CR") {
        (rest, false)
    } else {
        (upper.as_str(), false)
    };

    let value = parse_amount(body)?;
    Some(if is_debit { -value } else { value })
}

/// Format a value for the TSV contract: fixed two decimals, sign-bearing.
pub fn format_fixed(value: Decimal) -> String {
    format!("{:.2}", value)
}
