use std::collections::BTreeSet;

use dledger_types::Name;

/// One admitted record's in-memory bookkeeping.
///
/// `weight` and `entropy` are the same quantity by construction — the
/// cardinality of `approvers` — so only `approvers` is stored; both
/// accessors are kept at the type's boundary for clarity, since callers
/// reach for each name in different contexts.
#[derive(Clone, Debug)]
pub struct LedgerEntry {
    pub wire: Vec<u8>,
    approvers: BTreeSet<Name>,
    archived: bool,
}

impl LedgerEntry {
    pub fn new(wire: Vec<u8>, initial_approvers: BTreeSet<Name>) -> Self {
        Self { wire, approvers: initial_approvers, archived: false }
    }

    /// Count of distinct producer identities that approve this entry.
    pub fn weight(&self) -> usize {
        self.approvers.len()
    }

    /// Alias for [`Self::weight`] — kept distinct only for readability at
    /// call sites that talk about Sybil-resistance ("entropy").
    pub fn entropy(&self) -> usize {
        self.weight()
    }

    pub fn approvers(&self) -> &BTreeSet<Name> {
        &self.approvers
    }

    pub fn is_archived(&self) -> bool {
        self.archived
    }

    /// Add `approver` if not already present. Returns `true` iff the set
    /// actually grew (the caller uses this to decide whether to keep
    /// propagating into ancestors).
    pub(crate) fn add_approver(&mut self, approver: Name) -> bool {
        self.approvers.insert(approver)
    }

    pub(crate) fn mark_archived(&mut self) {
        self.archived = true;
    }
}
