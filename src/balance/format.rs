//! Exact fixed-point formatting and parsing of token amounts.

use alloy_primitives::U256;

/// Largest exponent whose power of ten fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

pub(crate) fn ten_pow(exp: u8) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(exp))
}

/// Fraction digits shown for an asset.
pub fn display_precision(symbol: &str) -> u8 {
    match symbol.to_ascii_uppercase().as_str() {
        "USDC" | "USDT" => 2,
        _ => 4,
    }
}

/// Formats `raw` base units with `decimals` into `precision` fraction digits,
/// rounding half up.
pub fn format_amount(raw: U256, decimals: u8, precision: u8) -> String {
    let (Some(divisor), Some(_)) = (ten_pow(decimals), ten_pow(precision)) else {
        return raw.to_string();
    };

    let mut int = raw / divisor;
    let rem = raw % divisor;

    let mut frac = if decimals > precision {
        // decimals - precision <= MAX_DECIMALS, so the step always fits
        let step = ten_pow(decimals - precision).unwrap_or(U256::MAX);
        let mut frac = rem / step;
        let leftover = rem % step;
        if leftover.saturating_mul(U256::from(2u64)) >= step {
            frac += U256::from(1u64);
        }
        frac
    } else {
        rem * ten_pow(precision - decimals).unwrap_or(U256::from(1u64))
    };

    let one_unit = ten_pow(precision).unwrap_or(U256::MAX);
    if frac >= one_unit {
        int = int.saturating_add(U256::from(1u64));
        frac -= one_unit;
    }

    if precision == 0 {
        return int.to_string();
    }
    let frac = frac.to_string();
    format!("{}.{:0>width$}", int, frac, width = precision as usize)
}

/// Parses a decimal amount into base units without floating point.
///
/// Accepts plain integers (already in base units) and `int.frac` strings
/// (human units, scaled by `decimals`; extra fraction digits are truncated).
pub fn parse_amount(text: &str, decimals: u8) -> Option<U256> {
    let text = text.trim();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (text, None),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) {
        return None;
    }

    let Some(frac) = frac_part else {
        if int_part.is_empty() {
            return None;
        }
        return U256::from_str_radix(int_part, 10).ok();
    };

    if !all_digits(frac) || (int_part.is_empty() && frac.is_empty()) {
        return None;
    }

    let scale = ten_pow(decimals)?;
    let int = if int_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(int_part, 10).ok()?
    };

    let kept: String = frac.chars().take(decimals as usize).collect();
    let padded = format!("{:0<width$}", kept, width = decimals as usize);
    let frac = if padded.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(&padded, 10).ok()?
    };

    int.checked_mul(scale)?.checked_add(frac)
}
