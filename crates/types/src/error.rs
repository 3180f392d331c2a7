use thiserror::Error;

/// Structural decode failures.
///
/// Carries a short, static reason rather than a formatted string: the
/// caller logs and drops the record, it never propagates further.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedRecord {
    #[error("record bytes could not be deserialized")]
    Undecodable,
    #[error("record name's digest component does not match its content digest")]
    DigestMismatch,
    #[error("record name is missing its digest component")]
    EmptyName,
    #[error("GENESIS record must not reference any preceding record")]
    GenesisWithPreceding,
    #[error("non-GENESIS record must reference at least one preceding record")]
    NonGenesisWithoutPreceding,
}
