//! cardledger-core: taxonomy, issuer identifiers and record types for the unified card ledger

pub mod error;
pub mod issuer;
pub mod record;
pub mod taxonomy;

pub use error::{LedgerError, LedgerResult};
pub use issuer::{ExportFormat, IssuerId, SignConvention, INVERTED_SIGN_ISSUERS, PINNED_CATEGORIES};
pub use record::{NormalizedRecord, SourceConfig, DEFAULT_PAYER, OUTPUT_HEADER};
pub use taxonomy::Category;
