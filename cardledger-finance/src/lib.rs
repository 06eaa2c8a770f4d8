//! cardledger-finance: category rules, row normalizer, batch pipeline and ledger summary

pub mod category_rules;
pub mod normalizer;
pub mod pipeline;
pub mod summary;

pub use category_rules::{classify, Classifier, ClassifierConfig, Decision, Predicate, Rule};
pub use normalizer::{is_payment, Normalizer};
pub use pipeline::{write_ledger, CompiledLedger, OutputOptions, Pipeline, SourceReport};
pub use summary::LedgerSummary;
