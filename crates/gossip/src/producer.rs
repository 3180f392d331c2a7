use std::collections::HashSet;

use dledger_admission::{AdmissionEngine, AdmissionOutcome};
use dledger_identity::CertList;
use dledger_store::DagStore;
use dledger_types::{Name, PayloadItem, Record, RecordContent, RecordType};
use fastcrypto::{ed25519::Ed25519KeyPair, traits::Signer as FastCryptoSigner};
use tokio::time::{interval, Duration, Interval};
use tracing::{debug, warn};

use crate::{message::sync_names, transport::Transport};

/// The producer's own signing identity: a keypair plus the identity prefix
/// it is certified under.
pub struct LocalSigner {
    pub identity: Name,
    keypair: Ed25519KeyPair,
}

impl LocalSigner {
    pub fn new(identity: Name, keypair: Ed25519KeyPair) -> Self {
        Self { identity, keypair }
    }

    pub fn sign_record(
        &self,
        mc_prefix: &Name,
        preceding: Vec<Name>,
        record_type: RecordType,
        payload: Vec<PayloadItem>,
    ) -> Record {
        let content = RecordContent { record_type, preceding, producer: self.identity.clone(), payload };
        let name = Record::compute_name(mc_prefix, &content);
        let signature = self.keypair.sign(&bcs::to_bytes(&content).expect("RecordContent is infallible"));
        Record { name, content, signature }
    }
}

/// Which periodic timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    RecordGen,
    Sync,
}

/// Owns the two periodic timers that drive local production; carries no
/// DAG state of its own — callers pass `&mut DagStore`/`&mut
/// AdmissionEngine`/`&CertList` into each tick's handler.
pub struct ProducerLoop {
    mc_prefix: Name,
    preceding_record_num: usize,
    record_gen_interval: Interval,
    sync_interval: Interval,
}

impl ProducerLoop {
    pub fn new(
        mc_prefix: Name,
        preceding_record_num: usize,
        record_gen_freq: Duration,
        sync_freq: Duration,
    ) -> Self {
        Self {
            mc_prefix,
            preceding_record_num,
            record_gen_interval: interval(record_gen_freq),
            sync_interval: interval(sync_freq),
        }
    }

    /// Await whichever timer fires next. Intended as one arm of the single
    /// event loop's `tokio::select!`.
    pub async fn tick(&mut self) -> Tick {
        tokio::select! {
            _ = self.record_gen_interval.tick() => Tick::RecordGen,
            _ = self.sync_interval.tick() => Tick::Sync,
        }
    }

    /// Record generation: pick `preceding_record_num` tip references,
    /// sign, admit locally, and broadcast a NOTIF. Skipped (back-pressure)
    /// while the admission engine has an unresolved `missing` backlog, and a
    /// no-op if the store has no tips yet to reference.
    pub async fn generate_record(
        &self,
        signer: &LocalSigner,
        payload: Vec<PayloadItem>,
        transport: &dyn Transport,
        awe: &mut AdmissionEngine,
        store: &mut DagStore,
        certs: &CertList,
    ) -> Option<Name> {
        if awe.has_backlog() {
            debug!(missing = awe.missing_count(), "producer loop: backlogged, skipping record generation");
            return None;
        }
        let tips = store.tips();
        if tips.is_empty() {
            return None;
        }
        let preceding = select_tips(&tips, &self.mc_prefix, &signer.identity, self.preceding_record_num);
        if preceding.is_empty() {
            return None;
        }

        let record = signer.sign_record(&self.mc_prefix, preceding, RecordType::Generic, payload);
        let name = record.name.clone();
        let digest = name.last().expect("freshly computed record name is never empty").to_string();

        match awe.admit(record, store, certs) {
            AdmissionOutcome::Admitted { .. } => {
                let notif = crate::message::notif_name(&self.mc_prefix, &signer.identity, &digest);
                if let Some(bytes) = store.get(&name).map(|e| e.wire.clone()) {
                    if let Err(e) = transport.put(&notif, bytes).await {
                        warn!(%name, error = %e, "failed to publish NOTIF for locally generated record");
                    }
                }
                Some(name)
            }
            other => {
                warn!(%name, ?other, "locally generated record was not admitted");
                None
            }
        }
    }

    /// Sync tick: broadcast the current tip set (possibly split across
    /// several SYNC names, see [`crate::message::MAX_SYNC_TIPS`]).
    pub async fn sync_tick(&self, transport: &dyn Transport, store: &DagStore) {
        let tips = store.tips();
        if tips.is_empty() {
            return;
        }
        for name in sync_names(&self.mc_prefix, &tips) {
            if let Err(e) = transport.put(&name, Vec::new()).await {
                warn!(error = %e, "failed to publish SYNC");
            }
        }
    }
}

/// Recover the producer identity prefix from a record name of the form
/// `<mc_prefix>/<producer>/<digest>`, the same structural decomposition the
/// admission engine uses for the interlock check.
fn producer_of(mc_prefix: &Name, name: &Name) -> Option<Name> {
    let suffix = name.strip_prefix(mc_prefix)?;
    if suffix.is_empty() {
        return None;
    }
    Some(suffix.parent())
}

/// Choose up to `count` tip references: prefer non-self-produced tips from
/// distinct producers first (honoring "not produced locally... at least two
/// distinct producers"), then non-self tips that repeat a producer, and only
/// fall back to self-produced tips once every non-self alternative is
/// exhausted (see DESIGN.md).
fn select_tips(tips: &[Name], mc_prefix: &Name, own_identity: &Name, count: usize) -> Vec<Name> {
    let (self_tips, non_self): (Vec<&Name>, Vec<&Name>) =
        tips.iter().partition(|t| producer_of(mc_prefix, t).as_ref() == Some(own_identity));

    let mut selected = Vec::new();
    let mut used_producers = HashSet::new();

    for tip in &non_self {
        if selected.len() >= count {
            break;
        }
        if let Some(producer) = producer_of(mc_prefix, tip) {
            if used_producers.insert(producer) {
                selected.push((*tip).clone());
            }
        }
    }
    for tip in &non_self {
        if selected.len() >= count {
            break;
        }
        if !selected.contains(tip) {
            selected.push((*tip).clone());
        }
    }
    for tip in &self_tips {
        if selected.len() >= count {
            break;
        }
        selected.push((*tip).clone());
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mc_prefix() -> Name {
        Name::from_components(["dledger", "fed-1"])
    }

    #[test]
    fn prefers_distinct_non_self_producers() {
        let mc = mc_prefix();
        let alice = Name::from_components(["alice"]);
        let tips = vec![
            mc.append("alice").append("d0"),
            mc.append("bob").append("d1"),
            mc.append("carol").append("d2"),
            mc.append("bob").append("d3"),
        ];
        let selected = select_tips(&tips, &mc, &alice, 2);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|t| producer_of(&mc, t).unwrap() != alice));
        let producers: HashSet<_> = selected.iter().map(|t| producer_of(&mc, t).unwrap()).collect();
        assert_eq!(producers.len(), 2);
    }

    #[test]
    fn falls_back_to_self_when_no_alternative() {
        let mc = mc_prefix();
        let alice = Name::from_components(["alice"]);
        let tips = vec![mc.append("alice").append("d0"), mc.append("alice").append("d1")];
        let selected = select_tips(&tips, &mc, &alice, 2);
        assert_eq!(selected.len(), 2, "must fall back to self-produced tips rather than stall");
    }
}
