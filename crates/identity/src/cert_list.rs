use std::collections::{HashMap, HashSet, VecDeque};

use dledger_types::{Name, Record};
use fastcrypto::{ed25519::Ed25519PublicKey, traits::VerifyingKey};
use tracing::{debug, warn};

use crate::cert::{Certificate, SignedInterest};
use crate::error::CertError;

/// How many entries `setLastCertRecords` keeps in the cert-record frontier
/// before the oldest is dropped, bounding unbounded growth if referencing
/// records never arrive.
const MAX_FRONTIER_LEN: usize = 256;

/// Tracks valid producer certificates per identity prefix, the revocation
/// set, and the rolling cert-record frontier.
pub struct CertList {
    trust_anchor: Ed25519PublicKey,
    by_identity: HashMap<Name, Vec<Certificate>>,
    revoked: HashSet<Name>,
    last_cert_records: VecDeque<Name>,
}

impl CertList {
    /// Construct an empty `CertList` bound to a bootstrap trust anchor that
    /// must verify every producer certificate before it is accepted.
    pub fn new(trust_anchor: Ed25519PublicKey) -> Self {
        Self {
            trust_anchor,
            by_identity: HashMap::new(),
            revoked: HashSet::new(),
            last_cert_records: VecDeque::new(),
        }
    }

    /// Insert a certificate, verifying it against the trust anchor first.
    ///
    /// Rejected if `cert.full_name` is already revoked: revocation is final,
    /// and re-inserting under a revoked name would resurrect a certificate
    /// the anchor no longer vouches for.
    pub fn insert(&mut self, cert: Certificate) -> Result<(), CertError> {
        if self.trust_anchor.verify(&cert.signed_bytes(), &cert.anchor_signature).is_err() {
            return Err(CertError::AnchorSignatureInvalid);
        }
        if self.revoked.contains(&cert.full_name) {
            debug!(identity = %cert.identity, "rejecting insert of already-revoked certificate");
            return Err(CertError::AlreadyRevoked);
        }
        self.by_identity.entry(cert.identity.clone()).or_default().push(cert);
        Ok(())
    }

    /// Revoke a certificate by its full name. Non-retroactive: records
    /// already admitted under this certificate remain admitted.
    pub fn revoke(&mut self, cert_full_name: Name) {
        self.revoked.insert(cert_full_name);
    }

    fn non_revoked_certs(&self, identity: &Name) -> impl Iterator<Item = &Certificate> {
        self.by_identity
            .get(identity)
            .into_iter()
            .flatten()
            .filter(|cert| !self.revoked.contains(&cert.full_name))
    }

    /// `true` iff some non-revoked certificate under the record's producer
    /// identity validates the record's signature.
    pub fn verify_data(&self, record: &Record) -> bool {
        let message = record.content_bytes();
        self.non_revoked_certs(record.producer())
            .any(|cert| cert.public_key.verify(&message, &record.signature).is_ok())
    }

    /// Equivalent of [`Self::verify_data`] for signed interests on the
    /// gossip plane (administrative operations).
    pub fn verify_interest(&self, interest: &SignedInterest) -> bool {
        let message = interest.signed_bytes();
        self.non_revoked_certs(&interest.identity)
            .any(|cert| cert.public_key.verify(&message, &interest.signature).is_ok())
    }

    /// `true` iff at least one non-revoked certificate exists for `identity`.
    pub fn authorized_to_generate(&self, identity: &Name) -> bool {
        self.non_revoked_certs(identity).next().is_some()
    }

    /// Maintain the rolling "cert-record frontier": add `name`, then drop
    /// any names that appear in `referenced` (they are now subsumed by
    /// records that reference them).
    pub fn set_last_cert_records(&mut self, name: Name, referenced: &[Name]) {
        self.last_cert_records.retain(|existing| !referenced.contains(existing));
        self.last_cert_records.push_back(name);
        while self.last_cert_records.len() > MAX_FRONTIER_LEN {
            if let Some(dropped) = self.last_cert_records.pop_front() {
                warn!(%dropped, "cert-record frontier exceeded bound, dropping oldest entry");
            }
        }
    }

    /// The current cert-record frontier, newest last.
    pub fn cert_record_frontier(&self) -> impl Iterator<Item = &Name> {
        self.last_cert_records.iter()
    }
}
