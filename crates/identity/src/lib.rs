//! Certificate list, revocation, and signature verification.
#![forbid(unsafe_code)]

mod cert;
mod cert_list;
mod error;

pub use cert::{Certificate, SignedInterest};
pub use cert_list::CertList;
pub use error::CertError;

#[cfg(test)]
mod tests {
    use dledger_types::{Name, PayloadItem, Record, RecordContent, RecordType};
    use fastcrypto::{
        ed25519::Ed25519KeyPair,
        traits::{KeyPair, Signer},
    };
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn anchor() -> Ed25519KeyPair {
        Ed25519KeyPair::generate(&mut StdRng::from_seed([42; 32]))
    }

    fn issue_cert(anchor: &Ed25519KeyPair, identity: Name, producer: &Ed25519KeyPair) -> Certificate {
        let full_name = identity.append("cert");
        let mut cert = Certificate {
            full_name,
            identity,
            public_key: producer.public().clone(),
            issued_at: 0,
            anchor_signature: anchor.sign(&[]),
        };
        cert.anchor_signature = anchor.sign(&cert.signed_bytes());
        cert
    }

    fn signed_record(producer_keypair: &Ed25519KeyPair, producer: Name, preceding: Vec<Name>) -> Record {
        let content = RecordContent {
            record_type: RecordType::Generic,
            preceding,
            producer,
            payload: vec![PayloadItem::new(0, b"x".to_vec())],
        };
        let mc_prefix = Name::from_components(["dledger", "fed-1"]);
        let name = Record::compute_name(&mc_prefix, &content);
        let signature = producer_keypair.sign(&bcs::to_bytes(&content).unwrap());
        Record { name, content, signature }
    }

    #[test]
    fn verify_data_accepts_valid_signature_and_rejects_forged() {
        let anchor = anchor();
        let mut cl = CertList::new(anchor.public().clone());
        let alice = Ed25519KeyPair::generate(&mut StdRng::from_seed([1; 32]));
        let identity = Name::from_components(["alice"]);
        let cert = issue_cert(&anchor, identity.clone(), &alice);
        cl.insert(cert).unwrap();

        let ancestor = Name::from_components(["dledger", "fed-1", "bob", "x"]);
        let record = signed_record(&alice, identity, vec![ancestor]);
        assert!(cl.verify_data(&record));

        let mallory = Ed25519KeyPair::generate(&mut StdRng::from_seed([99; 32]));
        let forged = signed_record(&mallory, Name::from_components(["alice"]), record.preceding().to_vec());
        assert!(!cl.verify_data(&forged));
    }

    #[test]
    fn revocation_is_checked_at_verify_time() {
        let anchor = anchor();
        let mut cl = CertList::new(anchor.public().clone());
        let alice = Ed25519KeyPair::generate(&mut StdRng::from_seed([2; 32]));
        let identity = Name::from_components(["alice"]);
        let cert = issue_cert(&anchor, identity.clone(), &alice);
        let cert_name = cert.full_name.clone();
        cl.insert(cert).unwrap();

        let ancestor = Name::from_components(["dledger", "fed-1", "bob", "x"]);
        let record = signed_record(&alice, identity.clone(), vec![ancestor.clone()]);
        assert!(cl.verify_data(&record));

        cl.revoke(cert_name);
        assert!(!cl.verify_data(&record), "revocation must reject future verification");
        assert!(!cl.authorized_to_generate(&identity));
    }

    #[test]
    fn insert_rejects_bad_anchor_signature() {
        let anchor = anchor();
        let mut cl = CertList::new(anchor.public().clone());
        let wrong_anchor = anchor();
        let alice = Ed25519KeyPair::generate(&mut StdRng::from_seed([3; 32]));
        let identity = Name::from_components(["alice"]);
        let cert = issue_cert(&wrong_anchor, identity, &alice);
        assert_eq!(cl.insert(cert), Err(CertError::AnchorSignatureInvalid));
    }

    #[test]
    fn cert_record_frontier_drops_referenced_names() {
        let anchor = anchor();
        let mut cl = CertList::new(anchor.public().clone());
        let a = Name::from_components(["r1"]);
        let b = Name::from_components(["r2"]);
        cl.set_last_cert_records(a.clone(), &[]);
        cl.set_last_cert_records(b.clone(), &[a.clone()]);
        let frontier: Vec<_> = cl.cert_record_frontier().cloned().collect();
        assert_eq!(frontier, vec![b]);
    }
}
