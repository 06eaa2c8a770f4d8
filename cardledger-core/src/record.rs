//! Ledger record types shared by the normalizer, the driver and the CLI.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::issuer::IssuerId;
use crate::taxonomy::Category;

/// Payer recorded when the issuer export has no card-member column.
pub const DEFAULT_PAYER: &str = "PRIMARY CARDHOLDER";

/// Header written when the output table is started fresh.
pub const OUTPUT_HEADER: [&str; 6] = ["Source", "Purchase Date", "Item", "Amount", "Category", "Spender"];

/// One accepted transaction in the unified ledger.
///
/// Field order is the output column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedRecord {
    /// Display label of the configured source ("Amex - Gold")
    #[serde(rename = "Source")]
    pub source: String,
    /// Purchase date exactly as the issuer wrote it
    #[serde(rename = "Purchase Date")]
    pub date: String,
    #[serde(rename = "Item")]
    pub merchant: String,
    /// Positive = money spent, negative = credit/refund
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Category")]
    pub category: Category,
    #[serde(rename = "Spender")]
    pub payer: String,
}

impl NormalizedRecord {
    pub fn is_spend(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_refund(&self) -> bool {
        self.amount < 0.0
    }
}

/// One input file of a run: where it is, what to call it, whose layout it uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub file: PathBuf,
    pub label: String,
    pub issuer: IssuerId,
}

impl SourceConfig {
    pub fn new(file: impl Into<PathBuf>, label: impl Into<String>, issuer: IssuerId) -> Self {
        Self {
            file: file.into(),
            label: label.into(),
            issuer,
        }
    }
}
