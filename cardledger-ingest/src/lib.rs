//! cardledger-ingest: issuer column layouts, amount/date parsing and header-keyed export parsers.

pub mod amount;
pub mod date;
pub mod hints;
pub mod parsers;
pub mod schema;

pub use amount::parse_amount;
pub use date::normalize_purchase_date;
pub use hints::{infer_source, SourceHint};
pub use parsers::{parse_fidelity_csv, parse_venmo_csv, VenmoSignPolicy};
pub use schema::{AmountCell, IssuerSchema, SchemaRegistry, BUILTIN_SCHEMAS};
