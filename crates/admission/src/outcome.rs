use dledger_types::{MalformedRecord, Name};
use thiserror::Error;

/// Why a candidate record was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("malformed record: {0}")]
    Malformed(#[from] MalformedRecord),
    #[error("producer signature does not verify under any non-revoked certificate")]
    SignatureInvalid,
    #[error("interlock violated: a preceding producer repeats or matches the record's own producer")]
    InterlockViolation,
    #[error("preceding entry already near-confirmed under the contribution policy")]
    ContributionViolation,
}

/// Result of [`crate::AdmissionEngine::admit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// The record was already admitted; re-delivery is idempotent.
    Known,
    /// The record was fully accepted. `newly_archived` lists every entry
    /// (possibly including records that were themselves deferred and are
    /// now admissible as a result) that crossed `confirm_weight` during
    /// this call.
    Admitted { newly_archived: Vec<Name> },
    /// The record's ancestors are not all present; it is held in the
    /// deferred set. `missing` lists the ancestor names newly added to the
    /// missing set (callers dispatch FETCH for these).
    Deferred { missing: Vec<Name> },
    /// The record failed a structural, identity, interlock, or
    /// contribution check and was dropped.
    Rejected(RejectReason),
}
