//! Issuer column layouts and the registry that hands them out.
//!
//! Column positions come from each issuer's CSV export, e.g. Capital One:
//! Transaction Date,Posted Date,Card No.,Description,Category,Debit,Credit

use cardledger_core::{IssuerId, LedgerError, LedgerResult};
use csv::StringRecord;
use std::collections::HashMap;

/// Where each field lives in one issuer's rows. `None` means the export has no such column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuerSchema {
    pub date_field: usize,
    pub merchant_field: usize,
    pub category_field: Option<usize>,
    pub debit_field: Option<usize>,
    pub credit_field: Option<usize>,
    pub payer_field: Option<usize>,
}

/// Which cell an amount was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountCell<'a> {
    /// Debit or single amount column, sign as the issuer wrote it
    Debit(&'a str),
    /// Dedicated credit column of a split Debit/Credit layout
    Credit(&'a str),
}

impl IssuerSchema {
    /// Schema with a single amount column and no category or payer.
    pub const fn single_amount(date_field: usize, merchant_field: usize, amount_field: usize) -> Self {
        Self {
            date_field,
            merchant_field,
            category_field: None,
            debit_field: Some(amount_field),
            credit_field: Some(amount_field),
            payer_field: None,
        }
    }

    pub const fn with_category(mut self, index: usize) -> Self {
        self.category_field = Some(index);
        self
    }

    pub const fn with_payer(mut self, index: usize) -> Self {
        self.payer_field = Some(index);
        self
    }

    pub const fn with_credit(mut self, index: usize) -> Self {
        self.credit_field = Some(index);
        self
    }

    pub fn date<'a>(&self, row: &'a StringRecord) -> LedgerResult<&'a str> {
        cell(row, "date", self.date_field)
    }

    pub fn merchant<'a>(&self, row: &'a StringRecord) -> LedgerResult<&'a str> {
        cell(row, "merchant", self.merchant_field)
    }

    /// Issuer category text, empty when the export has none.
    pub fn category<'a>(&self, row: &'a StringRecord) -> LedgerResult<&'a str> {
        optional_cell(row, "category", self.category_field)
    }

    pub fn payer<'a>(&self, row: &'a StringRecord) -> LedgerResult<Option<&'a str>> {
        self.payer_field
            .map(|index| cell(row, "payer", index))
            .transpose()
    }

    /// The debit cell when it holds a value, otherwise the credit cell.
    pub fn amount<'a>(&self, row: &'a StringRecord) -> LedgerResult<AmountCell<'a>> {
        if let Some(debit) = self.debit_field {
            let raw = cell(row, "debit", debit)?;
            if !raw.trim().is_empty() || self.credit_field.is_none_or(|c| c == debit) {
                return Ok(AmountCell::Debit(raw));
            }
        }
        match self.credit_field {
            Some(credit) => Ok(AmountCell::Credit(cell(row, "credit", credit)?)),
            None => Err(LedgerError::RowShapeMismatch {
                field: "amount",
                index: 0,
                row_len: row.len(),
            }),
        }
    }
}

fn cell<'a>(row: &'a StringRecord, field: &'static str, index: usize) -> LedgerResult<&'a str> {
    row.get(index).ok_or(LedgerError::RowShapeMismatch {
        field,
        index,
        row_len: row.len(),
    })
}

fn optional_cell<'a>(
    row: &'a StringRecord,
    field: &'static str,
    index: Option<usize>,
) -> LedgerResult<&'a str> {
    match index {
        Some(index) => cell(row, field, index),
        None => Ok(""),
    }
}

/// Built-in layouts for the positional issuer exports.
pub const BUILTIN_SCHEMAS: [(IssuerId, IssuerSchema); 6] = [
    (IssuerId::Amex, IssuerSchema::single_amount(0, 1, 4).with_category(12).with_payer(2)),
    (IssuerId::CapitalOne, IssuerSchema::single_amount(0, 3, 5).with_category(4).with_credit(6)),
    (IssuerId::Chase, IssuerSchema::single_amount(0, 2, 5).with_category(3)),
    (IssuerId::ChaseBusiness, IssuerSchema::single_amount(1, 3, 6).with_category(5)),
    (IssuerId::Discover, IssuerSchema::single_amount(0, 2, 3).with_category(4)),
    (IssuerId::OldNavy, IssuerSchema::single_amount(0, 1, 3)),
];

/// Read-only lookup from issuer to column layout.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<IssuerId, IssuerSchema>,
}

impl SchemaRegistry {
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_SCHEMAS)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (IssuerId, IssuerSchema)>) -> Self {
        Self {
            schemas: entries.into_iter().collect(),
        }
    }

    /// Header-keyed issuers (Venmo, Fidelity) have no positional schema and miss here.
    pub fn lookup(&self, issuer: IssuerId) -> LedgerResult<&IssuerSchema> {
        self.schemas.get(&issuer).ok_or_else(|| LedgerError::UnknownIssuer {
            issuer: issuer.to_string(),
        })
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
