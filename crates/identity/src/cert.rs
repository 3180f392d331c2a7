use dledger_types::Name;
use fastcrypto::ed25519::{Ed25519PublicKey, Ed25519Signature};
use serde::{Deserialize, Serialize};

/// A producer certificate, itself signed by the federation's trust anchor.
///
/// `full_name` is the certificate's own content-addressed name (it is, in
/// effect, a CERTIFICATE-typed record elsewhere in the system); `identity`
/// is the producer identity prefix the certificate authorizes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub full_name: Name,
    pub identity: Name,
    pub public_key: Ed25519PublicKey,
    pub issued_at: u64,
    /// The trust anchor's signature over [`Certificate::signed_bytes`].
    pub anchor_signature: Ed25519Signature,
}

impl Certificate {
    /// The exact bytes the trust anchor's signature covers.
    pub fn signed_bytes(&self) -> Vec<u8> {
        #[derive(Serialize)]
        struct Signed<'a> {
            identity: &'a Name,
            public_key: &'a Ed25519PublicKey,
            issued_at: u64,
        }
        bcs::to_bytes(&Signed {
            identity: &self.identity,
            public_key: &self.public_key,
            issued_at: self.issued_at,
        })
        .expect("certificate signing payload is infallible to serialize")
    }
}

/// A signed administrative message on the gossip plane (e.g. a revocation
/// request), verified the same way a record's producer signature is.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedInterest {
    pub name: Name,
    pub identity: Name,
    pub payload: Vec<u8>,
    pub signature: Ed25519Signature,
}

impl SignedInterest {
    pub fn signed_bytes(&self) -> Vec<u8> {
        #[derive(Serialize)]
        struct Signed<'a> {
            name: &'a Name,
            identity: &'a Name,
            payload: &'a [u8],
        }
        bcs::to_bytes(&Signed { name: &self.name, identity: &self.identity, payload: &self.payload })
            .expect("interest signing payload is infallible to serialize")
    }
}
