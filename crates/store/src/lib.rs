//! In-memory DAG index: ledger entries, tip set, archival export.
#![forbid(unsafe_code)]

mod dag_store;
mod entry;
mod error;

pub use dag_store::{DagStore, IncrementOutcome};
pub use entry::LedgerEntry;
pub use error::StoreError;
