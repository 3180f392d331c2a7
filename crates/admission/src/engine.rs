use std::collections::{BTreeSet, HashSet, VecDeque};

use dledger_identity::CertList;
use dledger_store::DagStore;
use dledger_types::{Name, Record};
use tracing::{debug, trace, warn};

use crate::{config::AdmissionConfig, outcome::AdmissionOutcome, outcome::RejectReason};

/// Validates and admits candidate records, propagating weight/approver
/// metadata through ancestors on acceptance.
///
/// Holds the peer's `missing` and `deferred` pending sets; `DagStore` and
/// `CertList` are borrowed transiently on each call rather than owned.
pub struct AdmissionEngine {
    config: AdmissionConfig,
    missing: HashSet<Name>,
    deferred: VecDeque<Record>,
}

impl AdmissionEngine {
    pub fn new(config: AdmissionConfig) -> Self {
        Self { config, missing: HashSet::new(), deferred: VecDeque::new() }
    }

    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    /// The set of ancestor names the peer has seen referenced but not yet
    /// obtained.
    pub fn missing(&self) -> impl Iterator<Item = &Name> {
        self.missing.iter()
    }

    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    /// Back-pressure signal for the producer loop.
    pub fn has_backlog(&self) -> bool {
        !self.missing.is_empty()
    }

    pub fn deferred_count(&self) -> usize {
        self.deferred.len()
    }

    /// Decode and admit wire bytes in one step (used by FETCH/NOTIF
    /// handlers, which only ever have bytes).
    pub fn admit_bytes(
        &mut self,
        bytes: &[u8],
        store: &mut DagStore,
        certs: &CertList,
    ) -> AdmissionOutcome {
        match Record::decode(bytes) {
            Ok(record) => self.admit(record, store, certs),
            Err(e) => AdmissionOutcome::Rejected(RejectReason::Malformed(e)),
        }
    }

    /// Run a candidate record through the six admission checks. On full
    /// acceptance, propagate weight/approvers and rescan the deferred set
    /// to a fixed point.
    pub fn admit(&mut self, record: Record, store: &mut DagStore, certs: &CertList) -> AdmissionOutcome {
        // 1. known
        if store.contains(&record.name) {
            return AdmissionOutcome::Known;
        }

        // 2. structural. `Record::decode` already enforces this for
        // records arriving over the wire; re-checked here so `admit()` is
        // safe to call directly with locally-built records too.
        if record.record_type().is_genesis() && !record.preceding().is_empty() {
            return AdmissionOutcome::Rejected(RejectReason::Malformed(
                dledger_types::MalformedRecord::GenesisWithPreceding,
            ));
        }
        if !record.record_type().is_genesis()
            && record.preceding().len() != self.config.preceding_record_num
        {
            warn!(name = %record.name, "rejecting record with wrong preceding count");
            return AdmissionOutcome::Rejected(RejectReason::Malformed(
                dledger_types::MalformedRecord::NonGenesisWithoutPreceding,
            ));
        }

        // 3. identity
        if !certs.verify_data(&record) {
            return AdmissionOutcome::Rejected(RejectReason::SignatureInvalid);
        }

        // 4. interlock
        if !self.interlock_ok(&record) {
            return AdmissionOutcome::Rejected(RejectReason::InterlockViolation);
        }

        // 5. contribution policy
        if self.config.using_contribution_policy {
            for preceding_name in record.preceding() {
                if let Some(entry) = store.get(preceding_name) {
                    if entry.entropy() >= self.config.confirm_weight {
                        return AdmissionOutcome::Rejected(RejectReason::ContributionViolation);
                    }
                }
            }
        }

        // 6. ancestor presence
        let missing_ancestors: Vec<Name> =
            record.preceding().iter().filter(|p| !store.contains(p)).cloned().collect();
        if !missing_ancestors.is_empty() {
            for ancestor in &missing_ancestors {
                self.missing.insert(ancestor.clone());
            }
            // Re-delivering the same bytes while a record is already held
            // in `deferred` must not duplicate it.
            if self.deferred.iter().any(|d| d.name == record.name) {
                return AdmissionOutcome::Deferred { missing: missing_ancestors };
            }
            debug!(name = %record.name, missing = missing_ancestors.len(), "deferring record");
            self.deferred.push_back(record);
            return AdmissionOutcome::Deferred { missing: missing_ancestors };
        }

        let mut newly_archived = self.accept(record, store);
        newly_archived.extend(self.rescan_deferred(store, certs));
        AdmissionOutcome::Admitted { newly_archived }
    }

    /// Producer identities across `preceding` must be pairwise distinct and
    /// none may equal the record's own producer. Producer
    /// identity is recovered from each preceding name's structure, not by
    /// looking the ancestor up (this check runs before ancestor presence).
    fn interlock_ok(&self, record: &Record) -> bool {
        let own_producer = record.producer();
        let mut seen = HashSet::new();
        for preceding_name in record.preceding() {
            let producer = match self.producer_of(preceding_name) {
                Some(p) => p,
                None => return false,
            };
            if &producer == own_producer || !seen.insert(producer) {
                return false;
            }
        }
        true
    }

    /// Recover the producer identity prefix from a record name of the form
    /// `<mc_prefix>/<producer>/<digest>`.
    fn producer_of(&self, name: &Name) -> Option<Name> {
        let suffix = name.strip_prefix(&self.config.mc_prefix)?;
        if suffix.is_empty() {
            return None;
        }
        Some(suffix.parent())
    }

    fn accept(&mut self, record: Record, store: &mut DagStore) -> Vec<Name> {
        let name = record.name.clone();
        let producer = record.producer().clone();
        let preceding = record.preceding().to_vec();

        store.insert(&record, BTreeSet::new()).expect("admission engine already checked uniqueness");
        for ancestor in &preceding {
            store.remove_from_tips(ancestor);
        }
        self.missing.remove(&name);

        self.propagate(preceding, producer, store)
    }

    /// Depth-limited traversal of ancestors via an explicit work queue
    /// bounded by a per-call visited set, avoiding stack recursion for long
    /// chains.
    fn propagate(&self, start: Vec<Name>, producer: Name, store: &mut DagStore) -> Vec<Name> {
        let mut archived_now = Vec::new();
        let mut visited: HashSet<Name> = HashSet::new();
        let mut queue: VecDeque<Name> = start.into();

        while let Some(name) = queue.pop_front() {
            if !visited.insert(name.clone()) {
                continue;
            }
            let outcome = match store.increment_weight(&name, producer.clone(), self.config.confirm_weight) {
                Ok(outcome) => outcome,
                Err(_) => {
                    trace!(%name, "propagate: ancestor missing from store, skipping");
                    continue;
                }
            };
            if !outcome.added {
                // already approved by this producer (or already archived):
                // stop, do not recurse further down this subpath.
                continue;
            }
            if outcome.archived_now {
                archived_now.push(name);
                continue;
            }
            if let Some(entry) = store.get(&name) {
                if let Ok(ancestor_record) = Record::decode(&entry.wire) {
                    for grand_ancestor in ancestor_record.preceding() {
                        queue.push_back(grand_ancestor.clone());
                    }
                }
            }
        }
        archived_now
    }

    /// Re-evaluate the deferred set from newest to oldest; a record becomes
    /// admissible once every name in its `preceding` is present. Repeats
    /// until a fixed point.
    fn rescan_deferred(&mut self, store: &mut DagStore, certs: &CertList) -> Vec<Name> {
        let mut archived = Vec::new();
        loop {
            let mut admitted_index = None;
            for (idx, candidate) in self.deferred.iter().enumerate().rev() {
                if candidate.preceding().iter().all(|p| store.contains(p)) {
                    admitted_index = Some(idx);
                    break;
                }
            }
            let Some(idx) = admitted_index else { break };
            let record = self.deferred.remove(idx).expect("index came from this deque");
            debug!(name = %record.name, "deferred record now admissible");
            // Re-run admission (minus the now-satisfied ancestor check) so
            // interlock/contribution are re-validated against current state.
            match self.admit(record, store, certs) {
                AdmissionOutcome::Admitted { newly_archived } => archived.extend(newly_archived),
                AdmissionOutcome::Rejected(reason) => {
                    warn!(?reason, "deferred record rejected on re-evaluation");
                }
                AdmissionOutcome::Known | AdmissionOutcome::Deferred { .. } => {}
            }
        }
        archived
    }
}
