//! Fidelity account activity parser. Only contributions land in the ledger, as Investments.
//!
//! Run Date,Action,Symbol,Description,Type,Quantity,Price ($),Commission ($),
//! Fees ($),Accrued Interest ($),Amount ($),Settlement Date

use cardledger_core::{Category, LedgerResult, NormalizedRecord};
use std::io::Read;

use super::{header_key, HeaderIndex};
use crate::amount::{is_blank, parse_amount};
use crate::date::normalize_purchase_date;

fn is_contribution(kind: &str, action: &str) -> bool {
    header_key(kind) == "contributions" || header_key(action).contains("contribution")
}

pub fn parse_fidelity_csv<R: Read>(
    reader: R,
    label: &str,
    payer: &str,
) -> LedgerResult<Vec<NormalizedRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut records = rdr.records();
    let Some(header) = records.next().transpose()? else {
        return Ok(Vec::new());
    };
    let index = HeaderIndex::new(&header);

    let mut out = Vec::new();
    for result in records {
        let record = result?;

        if !is_contribution(index.get(&record, "Type"), index.get(&record, "Action")) {
            continue;
        }

        let raw_amount = index.get(&record, "Amount ($)");
        if is_blank(raw_amount) {
            continue;
        }
        let amount = parse_amount(raw_amount)?.abs();

        let settled = index.get(&record, "Settlement Date");
        let date = if settled.is_empty() { index.get(&record, "Run Date") } else { settled };

        let merchant = [index.get(&record, "Description"), index.get(&record, "Symbol")]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or("(Fidelity Contribution)");

        out.push(NormalizedRecord {
            source: label.to_string(),
            date: normalize_purchase_date(date),
            merchant: merchant.to_string(),
            amount,
            category: Category::Investments,
            payer: payer.to_string(),
        });
    }

    Ok(out)
}
