//! Единый тип ошибок публичного API.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OfxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("header field {field}: expected {expected:?}, got {actual:?}")]
    Header {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },

    #[error("markup error at byte {pos}: {detail}")]
    Markup { detail: String, pos: usize },

    #[error("account type not supported: {0}")]
    UnsupportedAccountType(String),

    #[error("{0} information not found")]
    MissingSection(String),

    #[error("invalid amount: {raw:?}")]
    Amount { raw: String },

    #[error("invalid date/time token: {raw:?}")]
    Date { raw: String },

    #[error("bank account type unknown: {0:?}")]
    UnknownBankAccountType(String),

    #[error("unknown {field} value: {value:?}")]
    UnknownEnumValue { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, OfxError>;
