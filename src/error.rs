// src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the reconciliation core and the DHIS2 client.
///
/// `UnresolvedLabel` is the one callers are expected to act on: it names the
/// exact composite `"{row} {column}"` string that has no metadata entry, so a
/// human can fix the offending label in the table and retry. Assembly aborts
/// on the first such cell; a payload with wrong identifiers is worse than no
/// payload, because the reporting system trusts them blindly.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to find `{label}` in DHIS2 metadata")]
    UnresolvedLabel { label: String },

    #[error("authentication failed, check your username and password")]
    Authentication,

    #[error("HTTP error {status}: {detail}")]
    Http {
        status: reqwest::StatusCode,
        detail: String,
    },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("grid is not rectangular: row {row} has {got} cells, expected {expected}")]
    MalformedGrid {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("unknown period type `{0}`")]
    UnknownPeriodType(String),
}
