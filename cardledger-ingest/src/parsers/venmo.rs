//! Venmo account statement parser.
//!
//! Statements open with a preamble, then:
//! ,ID,Datetime,Type,Status,Note,From,To,Amount (total),...
//! and close with balance/footer rows that carry no status.

use cardledger_core::{Category, LedgerError, LedgerResult, NormalizedRecord};
use serde::{Deserialize, Serialize};
use std::io::Read;

use super::HeaderIndex;
use crate::amount::{is_blank, parse_amount};
use crate::date::normalize_purchase_date;

const REQUIRED_COLUMNS: [&str; 5] = ["Datetime", "Amount (total)", "Status", "Type", "Note"];

/// Sign applied to the absolute Venmo amount per transaction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenmoSignPolicy {
    pub negate_payments: bool,
    pub negate_charges: bool,
}

impl Default for VenmoSignPolicy {
    /// Payments sent count as spend, charges received as credits.
    fn default() -> Self {
        Self {
            negate_payments: false,
            negate_charges: true,
        }
    }
}

impl VenmoSignPolicy {
    fn apply(&self, amount: f64, kind: &str) -> f64 {
        let abs = amount.abs();
        match kind.trim().to_lowercase().as_str() {
            "payment" if self.negate_payments => -abs,
            "charge" if self.negate_charges => -abs,
            _ => abs,
        }
    }
}

/// Parse a Venmo statement into ledger records. Only completed transactions are kept.
pub fn parse_venmo_csv<R: Read>(
    reader: R,
    label: &str,
    payer: &str,
    policy: VenmoSignPolicy,
) -> LedgerResult<Vec<NormalizedRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut header: Option<HeaderIndex> = None;
    let mut out = Vec::new();

    for result in rdr.records() {
        let record = result?;

        let Some(index) = &header else {
            let candidate = HeaderIndex::new(&record);
            if candidate.has_all(&REQUIRED_COLUMNS) {
                header = Some(candidate);
            }
            continue;
        };

        let status = index.get(&record, "Status").to_lowercase();
        if !status.starts_with("complete") {
            continue;
        }

        let raw_amount = index.get(&record, "Amount (total)");
        if is_blank(raw_amount) {
            continue;
        }
        let amount = policy.apply(parse_amount(raw_amount)?, index.get(&record, "Type"));

        let note = index.get(&record, "Note");
        out.push(NormalizedRecord {
            source: label.to_string(),
            date: normalize_purchase_date(index.get(&record, "Datetime")),
            merchant: if note.is_empty() { "(Venmo)".to_string() } else { note.to_string() },
            amount,
            category: Category::Other,
            payer: payer.to_string(),
        });
    }

    if header.is_none() {
        return Err(LedgerError::MissingHeader {
            source_label: label.to_string(),
            columns: REQUIRED_COLUMNS.join(", "),
        });
    }
    Ok(out)
}
