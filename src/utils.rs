// Amount and URL helpers shared by the frame screens.

use ethers::types::U256;
use ethers::utils::ParseUnits;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::{AppError, Result};

/// Normalizes a smallest-unit amount into a decimal token amount.
pub fn units_to_decimal(value: U256, decimals: u32) -> Result<Decimal> {
    let base = U256::exp10(decimals as usize);
    let whole = value / base;
    let fraction = value % base;

    let whole = Decimal::from_str(&whole.to_string())
        .map_err(|e| AppError::Internal(format!("Amount too large to display: {}", e)))?;
    let fraction = Decimal::from_i128_with_scale(fraction.as_u128() as i128, decimals);

    whole
        .checked_add(fraction)
        .ok_or_else(|| AppError::Internal("Amount overflow".to_string()))
}

/// Parses a user-entered decimal amount into smallest units.
///
/// Plain (`2.5`) and scientific (`1e3`) notation are accepted. Empty,
/// unparseable, negative or over-precise input yields zero.
pub fn parse_token_amount(input: Option<&str>, decimals: u32) -> U256 {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return U256::zero();
    };

    let expanded;
    let raw = if raw.contains(|c| c == 'e' || c == 'E') {
        match Decimal::from_scientific(raw) {
            Ok(value) => {
                expanded = value.normalize().to_string();
                expanded.as_str()
            }
            Err(_) => return U256::zero(),
        }
    } else {
        raw
    };

    if let Some((_, fraction)) = raw.split_once('.') {
        if fraction.len() > decimals as usize {
            return U256::zero();
        }
    }

    match ethers::utils::parse_units(raw, decimals) {
        Ok(ParseUnits::U256(amount)) => amount,
        _ => U256::zero(),
    }
}

/// `1234.5` -> `1,234.50`
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// `1234.5` -> `$1,234.50`
pub fn format_usd(value: Decimal) -> String {
    let formatted = format_amount(value);
    match formatted.strip_prefix('-') {
        Some(positive) => format!("-${}", positive),
        None => format!("${}", formatted),
    }
}

/// Escapes text for HTML attributes and SVG text nodes.
pub fn escape_markup(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Percent-encodes a value for use as a single URL path segment.
pub fn path_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
