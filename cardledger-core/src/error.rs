use thiserror::Error;

/// Every way a ledger run can fail. All of them abort the run.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("unknown issuer: {issuer}")]
    UnknownIssuer { issuer: String },

    #[error("row has {row_len} fields, no {field} at index {index}")]
    RowShapeMismatch {
        field: &'static str,
        index: usize,
        row_len: usize,
    },

    #[error("malformed amount: {raw:?}")]
    MalformedAmount { raw: String },

    #[error("{source_label}: header row not found (need {columns})")]
    MissingHeader { source_label: String, columns: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
