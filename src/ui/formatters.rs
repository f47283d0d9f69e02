/// Display string for a price, with more precision the smaller it gets so
/// sub-cent prices never collapse to "0.00".
///
/// - below 0.0001: scientific notation, 2 mantissa decimals (`1.23e-5`)
/// - below 0.01: 4 decimals (`0.0050`)
/// - otherwise: 2 decimals (`1.23`)
///
/// Comparisons are strict, so 0.0001 and 0.01 fall into the wider branch.
/// Fixed-point output rounds exact halves away from zero (`0.125` -> `0.13`).
pub fn format_price(price: f64) -> String {
    if price < 0.0001 {
        format_exponential(price, 2)
    } else if price < 0.01 {
        format_fixed(price, 4)
    } else {
        format_fixed(price, 2)
    }
}

/// `d.dde±n`.
fn format_exponential(value: f64, digits: usize) -> String {
    signed_exponent(format!("{:.*e}", digits, value))
}

/// Rust's `{:e}` omits the `+` on non-negative exponents.
fn signed_exponent(formatted: String) -> String {
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => formatted,
    }
}

/// Fixed-point with `digits` decimals, ties rounded away from zero.
///
/// `{:.N}` rounds exact binary ties to even, so ties are detected on the exact
/// decimal expansion and bumped by hand. Magnitudes of 1e21 and up have no
/// fixed-point form and use the shortest exponent form (`1e+21`).
fn format_fixed(value: f64, digits: usize) -> String {
    if value.is_finite() && value.abs() >= 1e21 {
        return signed_exponent(format!("{:e}", value));
    }
    // every finite f64 has at most 1074 fractional digits
    let exact = format!("{:.1100}", value);
    if let Some(dot) = exact.find('.') {
        let (kept, rest) = exact.split_at(dot + 1 + digits);
        if let Some(after) = rest.strip_prefix('5') {
            if after.bytes().all(|b| b == b'0') {
                return increment_magnitude(kept);
            }
        }
    }
    format!("{:.*}", digits, value)
}

/// Adds one unit in the last place to a truncated fixed-point string,
/// carrying through nines (`"-9.99"` -> `"-10.00"`).
fn increment_magnitude(fixed: &str) -> String {
    let mut chars: Vec<char> = fixed.chars().collect();
    let mut carry = true;
    for c in chars.iter_mut().rev() {
        match *c {
            '9' => *c = '0',
            '0'..='8' => {
                *c = (*c as u8 + 1) as char;
                carry = false;
                break;
            }
            _ => {}
        }
    }
    if carry {
        let at = usize::from(chars.first() == Some(&'-'));
        chars.insert(at, '1');
    }
    chars.into_iter().collect()
}

pub fn format_usd(price: f64) -> String {
    format!("${}", format_price(price))
}

pub fn format_change_percent(change: f64) -> String {
    if change >= 0.0 {
        format!("+{:.2}%", change)
    } else {
        format!("{:.2}%", change)
    }
}

/// Liquidity and volume figures with a K/M/B/T suffix. The sign is kept so
/// a negative delta never reads as a positive amount.
pub fn format_compact(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let body = if abs >= 1_000_000_000_000.0 {
        format!("{:.2}T", abs / 1_000_000_000_000.0)
    } else if abs >= 1_000_000_000.0 {
        format!("{:.2}B", abs / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.2}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.2}K", abs / 1_000.0)
    } else {
        format!("{:.0}", abs)
    };
    if body.chars().all(|c| c == '0' || c == '.') {
        return body;
    }
    format!("{}{}", sign, body)
}

pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let end = s
            .char_indices()
            .nth(max_len.saturating_sub(3))
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        format!("{}...", &s[..end])
    } else {
        s.to_string()
    }
}
