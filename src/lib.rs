//! Reconciliation core for digitized paper tally sheets.
//!
//! OCR-extracted table grids come in with noisy row and column labels; this
//! crate matches them against a DHIS2 data set's metadata, evaluates the
//! arithmetic clerks write into cells, and assembles the canonical
//! data-value records the reporting system accepts.

pub mod arith;
pub mod assemble;
pub mod dates;
pub mod dhis2;
pub mod error;
pub mod metadata;
pub mod period;
pub mod reconcile;
pub mod similarity;
pub mod table;

pub use error::{Error, Result};
