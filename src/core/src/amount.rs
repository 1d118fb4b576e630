//! Conversion between user-facing whole-unit decimals and lamports.
//!
//! Everything is integer arithmetic. A decimal string is split at the point,
//! the fractional part is right-padded to [`DECIMALS`] digits, and both halves
//! are combined with checked multiplication and addition.

use crate::errors::CoreError;
use crate::types::{Lamports, DECIMALS, LAMPORTS_PER_SOL};

/// Parses a whole-unit decimal such as `"2"`, `"0.5"` or `".25"` into lamports.
///
/// Zero is accepted. Negative values, non-finite spellings, exponents, more
/// significant fractional digits than the base unit can hold, and values that
/// overflow `u64` lamports are rejected with [`CoreError::InvalidAmount`].
pub fn parse_sol(input: &str) -> Result<Lamports, CoreError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(CoreError::invalid_amount(input, "empty amount"));
    }
    if text.starts_with('-') {
        return Err(CoreError::invalid_amount(input, "amount must not be negative"));
    }
    let text = text.strip_prefix('+').unwrap_or(text);

    let lowered = text.to_ascii_lowercase();
    if lowered.contains("nan") || lowered.contains("inf") {
        return Err(CoreError::invalid_amount(input, "amount must be a finite number"));
    }

    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(CoreError::invalid_amount(input, "no digits"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::invalid_amount(input, "expected a plain decimal number"));
    }

    // Digits past the ninth place are only allowed when they are zeros.
    let significant = fraction.trim_end_matches('0');
    let precision = DECIMALS as usize;
    if significant.len() > precision {
        return Err(CoreError::invalid_amount(
            input,
            format!("more than {} decimal places", DECIMALS),
        ));
    }

    let whole_lamports = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .ok()
            .and_then(|w| w.checked_mul(LAMPORTS_PER_SOL))
            .ok_or_else(|| CoreError::invalid_amount(input, "amount is too large"))?
    };

    let fraction_lamports = if significant.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", significant, width = precision);
        padded
            .parse::<u64>()
            .map_err(|e| CoreError::invalid_amount(input, e.to_string()))?
    };

    whole_lamports
        .checked_add(fraction_lamports)
        .ok_or_else(|| CoreError::invalid_amount(input, "amount is too large"))
}

/// Converts a whole number of coins to lamports, or `None` on overflow.
pub fn sol_to_lamports(sol: u64) -> Option<Lamports> {
    sol.checked_mul(LAMPORTS_PER_SOL)
}

/// Renders lamports as a whole-unit decimal with trailing zeros removed,
/// e.g. `1_500_000_000` becomes `"1.5"` and `2_000_000_000` becomes `"2"`.
pub fn format_lamports(lamports: Lamports) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let fraction = lamports % LAMPORTS_PER_SOL;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", fraction, width = DECIMALS as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
