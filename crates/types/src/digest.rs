use fastcrypto::hash::{HashFunction, Sha256};

/// SHA-256 content digest, hex-encoded so it can be used directly as a
/// [`crate::Name`] component.
///
/// `digest(content) == record.name.last()` is the round-trip invariant
/// checked in `Record::decode`.
pub fn digest_component(content_bytes: &[u8]) -> String {
    let mut hasher = Sha256::default();
    hasher.update(content_bytes);
    hex::encode(hasher.finalize().digest)
}
