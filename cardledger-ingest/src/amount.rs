//! Amount cell parsing.
//!
//! Exports write amounts as `-42.50`, `$1,204.10`, `($20.00)` or `+ 89.00`.

use cardledger_core::{LedgerError, LedgerResult};
use regex::Regex;
use std::sync::LazyLock;

static DETACHED_SIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])\s*(\d+(?:\.\d+)?|\.\d+)$").expect("valid regex"));

/// Parse an amount cell, keeping the sign the issuer wrote.
pub fn parse_amount(raw: &str) -> LedgerResult<f64> {
    let malformed = || LedgerError::MalformedAmount {
        raw: raw.to_string(),
    };

    let mut s = raw.trim();
    let parenthesised = s.len() >= 2 && s.starts_with('(') && s.ends_with(')');
    if parenthesised {
        s = s[1..s.len() - 1].trim();
    }

    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '$' | ','))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(malformed());
    }

    let value = match DETACHED_SIGN.captures(cleaned) {
        Some(caps) => {
            let magnitude: f64 = caps[2].parse().map_err(|_| malformed())?;
            if &caps[1] == "-" { -magnitude } else { magnitude }
        }
        None => cleaned.parse::<f64>().map_err(|_| malformed())?,
    };

    if !value.is_finite() {
        return Err(malformed());
    }
    Ok(if parenthesised { -value.abs() } else { value })
}

/// True when the cell has nothing to parse.
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}
