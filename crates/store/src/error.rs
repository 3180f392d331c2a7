use dledger_types::Name;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record {0} is already admitted")]
    AlreadyExists(Name),
    #[error("no admitted entry for {0}")]
    NotFound(Name),
}
