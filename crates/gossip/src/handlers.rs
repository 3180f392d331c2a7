use std::collections::{HashSet, VecDeque};

use dledger_admission::{AdmissionEngine, AdmissionOutcome};
use dledger_identity::CertList;
use dledger_store::DagStore;
use dledger_types::Name;
use tracing::{debug, trace, warn};

use crate::{
    message::{record_name_from_notif, tips_from_sync},
    transport::Transport,
};

/// A message arriving from the gossip plane, already demultiplexed by name
/// prefix. Produced by whatever glues a concrete [`Transport`] to the
/// driving loop; handled inline on the same task, never dispatched to a
/// worker thread.
pub enum Inbound {
    Notif { name: Name },
    Sync { name: Name },
    Fetch { name: Name },
}

/// Handle an inbound NOTIF: ignore if already known, otherwise FETCH the
/// derived record name and feed the bytes to admission.
pub async fn handle_notif(
    mc_prefix: &Name,
    notif_name: &Name,
    transport: &dyn Transport,
    awe: &mut AdmissionEngine,
    store: &mut DagStore,
    certs: &CertList,
) {
    let Some(record_name) = record_name_from_notif(mc_prefix, notif_name) else {
        warn!(%notif_name, "NOTIF name not under our multicast prefix, ignoring");
        return;
    };
    if store.contains(&record_name) {
        trace!(%record_name, "NOTIF for already-known record, ignoring");
        return;
    }
    match transport.fetch(&record_name).await {
        Ok(Some(bytes)) => {
            let outcome = awe.admit_bytes(&bytes, store, certs);
            debug!(%record_name, ?outcome, "admitted record fetched in response to NOTIF");
            if let AdmissionOutcome::Deferred { missing } = outcome {
                fetch_missing(transport, awe, store, certs, missing).await;
            }
        }
        Ok(None) => trace!(%record_name, "FETCH for NOTIF-ed record came back empty"),
        Err(e) => warn!(%record_name, error = %e, "FETCH for NOTIF-ed record failed"),
    }
}

/// Handle an inbound SYNC: for each tip carried in the message, FETCH
/// what's missing; if we're strictly ahead on any tip, reply with our own
/// tip set so convergence runs in both directions. Returns `true` if a
/// reply SYNC should be emitted.
pub async fn handle_sync(
    mc_prefix: &Name,
    sync_name: &Name,
    transport: &dyn Transport,
    awe: &mut AdmissionEngine,
    store: &mut DagStore,
    certs: &CertList,
) -> bool {
    let Some(tips) = tips_from_sync(mc_prefix, sync_name) else {
        warn!(%sync_name, "SYNC name not under our multicast prefix (or malformed), ignoring");
        return false;
    };

    let mut reply = false;
    for tip in tips {
        match store.get(&tip) {
            None => match transport.fetch(&tip).await {
                Ok(Some(bytes)) => {
                    let outcome = awe.admit_bytes(&bytes, store, certs);
                    debug!(%tip, ?outcome, "admitted tip fetched in response to SYNC");
                    if let AdmissionOutcome::Deferred { missing } = outcome {
                        fetch_missing(transport, awe, store, certs, missing).await;
                    }
                }
                Ok(None) => trace!(%tip, "FETCH for SYNC tip came back empty"),
                Err(e) => warn!(%tip, error = %e, "FETCH for SYNC tip failed"),
            },
            Some(entry) if entry.weight() > 1 => reply = true,
            Some(_) => {}
        }
    }
    reply
}

/// Drain a deferred record's missing ancestors: FETCH each by name and feed
/// the bytes back through admission. A fetched ancestor can itself come back
/// `Deferred` on a deeper ancestor, so newly reported names are folded into
/// the same work queue rather than handled one level deep; a per-call
/// visited set keeps a name already tried in this drain from being re-queued.
pub async fn fetch_missing(
    transport: &dyn Transport,
    awe: &mut AdmissionEngine,
    store: &mut DagStore,
    certs: &CertList,
    missing: Vec<Name>,
) {
    let mut queue: VecDeque<Name> = missing.into();
    let mut tried: HashSet<Name> = HashSet::new();

    while let Some(name) = queue.pop_front() {
        if store.contains(&name) || !tried.insert(name.clone()) {
            continue;
        }
        match transport.fetch(&name).await {
            Ok(Some(bytes)) => {
                let outcome = awe.admit_bytes(&bytes, store, certs);
                debug!(%name, ?outcome, "admitted record fetched for deferred ancestor");
                if let AdmissionOutcome::Deferred { missing: deeper } = outcome {
                    queue.extend(deeper);
                }
            }
            Ok(None) => trace!(%name, "FETCH for missing ancestor came back empty"),
            Err(e) => warn!(%name, error = %e, "FETCH for missing ancestor failed"),
        }
    }
}

/// Serve a FETCH from local state. `None` is a cache miss — callers decide
/// separately whether to forward it opportunistically; this function never
/// synthesizes an empty response to satisfy the request itself.
pub fn serve_fetch(store: &DagStore, name: &Name) -> Option<Vec<u8>> {
    store.get(name).map(|entry| entry.wire.clone())
}
