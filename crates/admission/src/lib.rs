//! Admission and weight-propagation engine.
#![forbid(unsafe_code)]

mod config;
mod engine;
mod outcome;

pub use config::AdmissionConfig;
pub use engine::AdmissionEngine;
pub use outcome::{AdmissionOutcome, RejectReason};

#[cfg(test)]
mod tests {
    use dledger_identity::{CertList, Certificate};
    use dledger_store::DagStore;
    use dledger_types::{Name, PayloadItem, Record, RecordContent, RecordType};
    use fastcrypto::{
        ed25519::Ed25519KeyPair,
        traits::{KeyPair, Signer},
    };
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const MC_PREFIX_COMPONENTS: [&str; 2] = ["dledger", "fed-1"];

    fn mc_prefix() -> Name {
        Name::from_components(MC_PREFIX_COMPONENTS)
    }

    struct Peer {
        identity: Name,
        keypair: Ed25519KeyPair,
    }

    impl Peer {
        fn new(seed: u8, name: &str) -> Self {
            Self {
                identity: Name::from_components([name]),
                keypair: Ed25519KeyPair::generate(&mut StdRng::from_seed([seed; 32])),
            }
        }

        fn sign_record(&self, preceding: Vec<Name>, record_type: RecordType) -> Record {
            let content = RecordContent {
                record_type,
                preceding,
                producer: self.identity.clone(),
                payload: vec![PayloadItem::new(0, b"x".to_vec())],
            };
            let name = Record::compute_name(&mc_prefix(), &content);
            let signature = self.keypair.sign(&bcs::to_bytes(&content).unwrap());
            Record { name, content, signature }
        }
    }

    fn anchored_certs(peers: &[&Peer]) -> CertList {
        let anchor = Ed25519KeyPair::generate(&mut StdRng::from_seed([200; 32]));
        let mut certs = CertList::new(anchor.public().clone());
        for peer in peers {
            let mut cert = Certificate {
                full_name: peer.identity.append("cert"),
                identity: peer.identity.clone(),
                public_key: peer.keypair.public().clone(),
                issued_at: 0,
                anchor_signature: anchor.sign(&[]),
            };
            cert.anchor_signature = anchor.sign(&cert.signed_bytes());
            certs.insert(cert).unwrap();
        }
        certs
    }

    fn engine() -> AdmissionEngine {
        AdmissionEngine::new(AdmissionConfig::new(mc_prefix(), 2, 3))
    }

    #[test]
    fn genesis_admits_and_seeds_tips() {
        let alice = Peer::new(1, "alice");
        let certs = anchored_certs(&[&alice]);
        let mut store = DagStore::new();
        let mut awe = engine();

        let genesis = alice.sign_record(vec![], RecordType::Genesis);
        let outcome = awe.admit(genesis.clone(), &mut store, &certs);
        assert_eq!(outcome, AdmissionOutcome::Admitted { newly_archived: vec![] });
        assert!(store.is_tip(&genesis.name));
    }

    #[test]
    fn interlock_rejects_self_referencing_record() {
        let alice = Peer::new(1, "alice");
        let certs = anchored_certs(&[&alice]);
        let mut store = DagStore::new();
        let mut awe = AdmissionEngine::new(AdmissionConfig::new(mc_prefix(), 1, 3));

        let genesis_a = alice.sign_record(vec![], RecordType::Genesis);
        awe.admit(genesis_a.clone(), &mut store, &certs);
        let genesis_a2 = alice.sign_record(vec![], RecordType::Genesis);
        awe.admit(genesis_a2.clone(), &mut store, &certs);

        // Alice's own record references only her own prior records: violates
        // interlock ("none may equal the record's own producer").
        let bad = alice.sign_record(vec![genesis_a.name.clone()], RecordType::Generic);
        let outcome = awe.admit(bad, &mut store, &certs);
        assert_eq!(outcome, AdmissionOutcome::Rejected(RejectReason::InterlockViolation));
        assert_eq!(store.len(), 2, "rejected record must not be admitted");
    }

    #[test]
    fn confirmation_after_four_distinct_producers() {
        let producers: Vec<Peer> =
            (0..5u8).map(|i| Peer::new(i + 10, &format!("peer-{i}"))).collect();
        let refs: Vec<&Peer> = producers.iter().collect();
        let certs = anchored_certs(&refs);
        let mut store = DagStore::new();
        let mut awe = AdmissionEngine::new(AdmissionConfig::new(mc_prefix(), 1, 3));

        let target = producers[0].sign_record(vec![], RecordType::Genesis);
        awe.admit(target.clone(), &mut store, &certs);

        for producer in &producers[1..5] {
            let successor = producer.sign_record(vec![target.name.clone()], RecordType::Generic);
            awe.admit(successor, &mut store, &certs);
        }

        let entry = store.get(&target.name).expect("target admitted");
        assert!(entry.is_archived(), "target should be archived after 4 distinct approvers (confirm_weight=3)");
    }

    #[test]
    fn deferred_admission_then_ancestor_arrives() {
        let alice = Peer::new(1, "alice");
        let bob = Peer::new(2, "bob");
        let certs = anchored_certs(&[&alice, &bob]);
        let mut store = DagStore::new();
        let mut awe = AdmissionEngine::new(AdmissionConfig::new(mc_prefix(), 1, 3));

        let ancestor = alice.sign_record(vec![], RecordType::Genesis);
        let child = bob.sign_record(vec![ancestor.name.clone()], RecordType::Generic);

        // deliver child before its ancestor
        let outcome = awe.admit(child.clone(), &mut store, &certs);
        assert_eq!(outcome, AdmissionOutcome::Deferred { missing: vec![ancestor.name.clone()] });
        assert_eq!(awe.missing_count(), 1);
        assert!(!store.contains(&child.name));

        // re-delivering the same bytes must not duplicate the deferred entry
        let outcome2 = awe.admit(child.clone(), &mut store, &certs);
        assert_eq!(outcome2, AdmissionOutcome::Deferred { missing: vec![ancestor.name.clone()] });
        assert_eq!(awe.deferred_count(), 1);

        // now the ancestor arrives
        let outcome3 = awe.admit(ancestor.clone(), &mut store, &certs);
        assert!(matches!(outcome3, AdmissionOutcome::Admitted { .. }));
        assert!(store.contains(&child.name), "deferred child should admit once ancestor arrives");
        assert!(!store.is_tip(&ancestor.name));
        assert!(store.is_tip(&child.name));
    }

    #[test]
    fn idempotent_redelivery_of_admitted_record() {
        let alice = Peer::new(1, "alice");
        let certs = anchored_certs(&[&alice]);
        let mut store = DagStore::new();
        let mut awe = engine();

        let genesis = alice.sign_record(vec![], RecordType::Genesis);
        awe.admit(genesis.clone(), &mut store, &certs);
        let before = store.len();
        let outcome = awe.admit(genesis, &mut store, &certs);
        assert_eq!(outcome, AdmissionOutcome::Known);
        assert_eq!(store.len(), before);
    }

    #[test]
    fn single_producer_multiple_successors_increments_once() {
        let alice = Peer::new(1, "alice");
        let bob = Peer::new(2, "bob");
        let certs = anchored_certs(&[&alice, &bob]);
        let mut store = DagStore::new();
        let mut awe = AdmissionEngine::new(AdmissionConfig::new(mc_prefix(), 1, 3));

        let target = alice.sign_record(vec![], RecordType::Genesis);
        awe.admit(target.clone(), &mut store, &certs);

        // Bob issues two successive records, both referencing `target`
        // through a chain from the same identity: weight(target) should
        // grow by at most one for Bob regardless of how many of Bob's own
        // records end up downstream of it (Sybil bound).
        let bob_1 = bob.sign_record(vec![target.name.clone()], RecordType::Generic);
        awe.admit(bob_1.clone(), &mut store, &certs);
        let bob_2 = bob.sign_record(vec![bob_1.name.clone()], RecordType::Generic);
        awe.admit(bob_2, &mut store, &certs);

        assert_eq!(store.get(&target.name).unwrap().weight(), 1);
    }
}
