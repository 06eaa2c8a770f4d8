//! Parsers for exports whose columns are found by header name rather than position.

pub mod fidelity;
pub mod venmo;

use csv::StringRecord;
use std::collections::HashMap;

pub use fidelity::parse_fidelity_csv;
pub use venmo::{parse_venmo_csv, VenmoSignPolicy};

/// Lowercased, whitespace-collapsed, BOM-free header key.
pub(crate) fn header_key(s: &str) -> String {
    s.replace('\u{FEFF}', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Header name → column index for one header row.
#[derive(Debug, Clone, Default)]
pub(crate) struct HeaderIndex {
    columns: HashMap<String, usize>,
}

impl HeaderIndex {
    pub(crate) fn new(header: &StringRecord) -> Self {
        let mut columns = HashMap::new();
        for (i, name) in header.iter().enumerate() {
            let key = header_key(name);
            if !key.is_empty() {
                columns.entry(key).or_insert(i);
            }
        }
        Self { columns }
    }

    pub(crate) fn has_all(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.columns.contains_key(&header_key(n)))
    }

    /// Trimmed, BOM-free cell under `name`; empty when the column or cell is missing.
    pub(crate) fn get<'a>(&self, row: &'a StringRecord, name: &str) -> &'a str {
        self.columns
            .get(&header_key(name))
            .and_then(|&i| row.get(i))
            .map(|v| v.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}'))
            .unwrap_or("")
    }
}
