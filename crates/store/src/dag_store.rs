use std::collections::{BTreeSet, VecDeque};

use dledger_types::{Name, Record};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::{entry::LedgerEntry, error::StoreError};

/// Outcome of [`DagStore::increment_weight`]: whether the approver set grew
/// and whether that growth crossed the archival threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IncrementOutcome {
    pub added: bool,
    pub archived_now: bool,
}

/// Authoritative in-memory index of admitted records.
///
/// Single-threaded and `!Sync` — the cooperative event loop is the only
/// owner.
pub struct DagStore {
    entries: IndexMap<Name, LedgerEntry>,
    tips: IndexSet<Name>,
    pending_archive: VecDeque<Name>,
}

impl Default for DagStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DagStore {
    pub fn new() -> Self {
        Self { entries: IndexMap::new(), tips: IndexSet::new(), pending_archive: VecDeque::new() }
    }

    pub fn get(&self, name: &Name) -> Option<&LedgerEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_tip(&self, name: &Name) -> bool {
        self.tips.contains(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a newly admitted record. `name` must not already exist; the
    /// new entry is added to the tip set.
    pub fn insert(
        &mut self,
        record: &Record,
        initial_approvers: BTreeSet<Name>,
    ) -> Result<(), StoreError> {
        if self.entries.contains_key(&record.name) {
            return Err(StoreError::AlreadyExists(record.name.clone()));
        }
        self.entries.insert(record.name.clone(), LedgerEntry::new(record.encode(), initial_approvers));
        self.tips.insert(record.name.clone());
        Ok(())
    }

    /// Remove `name` from the tip set (called when some successor is
    /// admitted that references it).
    pub fn remove_from_tips(&mut self, name: &Name) -> bool {
        self.tips.shift_remove(name)
    }

    /// Add `approver` to `name`'s approver set. If this crosses
    /// `confirm_weight`, the entry is archived (removed from tips, queued
    /// for [`Self::archived_export`]); the caller uses
    /// [`IncrementOutcome::added`]/`archived_now` to decide whether to keep
    /// propagating into ancestors.
    ///
    /// A no-op (`added: false`) if the entry is already archived or
    /// `approver` was already present — propagation never double-counts a
    /// single producer identity.
    pub fn increment_weight(
        &mut self,
        name: &Name,
        approver: Name,
        confirm_weight: usize,
    ) -> Result<IncrementOutcome, StoreError> {
        let entry = self.entries.get_mut(name).ok_or_else(|| StoreError::NotFound(name.clone()))?;
        if entry.is_archived() {
            return Ok(IncrementOutcome { added: false, archived_now: false });
        }
        if !entry.add_approver(approver) {
            return Ok(IncrementOutcome { added: false, archived_now: false });
        }
        if entry.entropy() >= confirm_weight {
            entry.mark_archived();
            self.tips.shift_remove(name);
            self.pending_archive.push_back(name.clone());
            debug!(%name, weight = entry.weight(), "entry archived");
            return Ok(IncrementOutcome { added: true, archived_now: true });
        }
        Ok(IncrementOutcome { added: true, archived_now: false })
    }

    /// The current tip set, in insertion order.
    pub fn tips(&self) -> Vec<Name> {
        self.tips.iter().cloned().collect()
    }

    pub fn tip_count(&self) -> usize {
        self.tips.len()
    }

    /// Drain and return entries that transitioned to archived since the
    /// last call, for consumption by an external archive sink. Entries
    /// remain in the main index (`get`/`contains` keep working).
    pub fn archived_export(&mut self) -> Vec<(Name, LedgerEntry)> {
        let mut out = Vec::with_capacity(self.pending_archive.len());
        while let Some(name) = self.pending_archive.pop_front() {
            if let Some(entry) = self.entries.get(&name) {
                out.push((name, entry.clone()));
            }
        }
        out
    }
}
