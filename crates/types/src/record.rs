use fastcrypto::ed25519::Ed25519Signature;
use serde::{Deserialize, Serialize};

use crate::{digest::digest_component, error::MalformedRecord, name::Name};

/// The four record kinds carried over the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum RecordType {
    Generic = 0,
    Certificate = 1,
    Revocation = 2,
    Genesis = 3,
}

impl RecordType {
    pub fn is_genesis(self) -> bool {
        matches!(self, RecordType::Genesis)
    }
}

/// A single tagged, opaque payload item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadItem {
    pub tag: u8,
    pub bytes: Vec<u8>,
}

impl PayloadItem {
    pub fn new(tag: u8, bytes: impl Into<Vec<u8>>) -> Self {
        Self { tag, bytes: bytes.into() }
    }
}

/// The signed portion of a record: everything except the record's own name.
///
/// `Record::content_bytes` is the exact byte range the signature covers and
/// the digest is computed over; it is stable across encode/decode
/// round-trips because it never contains the name itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordContent {
    pub record_type: RecordType,
    pub preceding: Vec<Name>,
    pub producer: Name,
    pub payload: Vec<PayloadItem>,
}

/// A fully formed, signed record as admitted into (or rejected from) the DAG.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: Name,
    pub content: RecordContent,
    pub signature: Ed25519Signature,
}

impl Record {
    /// The producer identity prefix that authored this record.
    pub fn producer(&self) -> &Name {
        &self.content.producer
    }

    pub fn record_type(&self) -> RecordType {
        self.content.record_type
    }

    pub fn preceding(&self) -> &[Name] {
        &self.content.preceding
    }

    /// The exact bytes the signature is computed over (RM `contentBytes`).
    pub fn content_bytes(&self) -> Vec<u8> {
        bcs::to_bytes(&self.content).expect("RecordContent serialization is infallible")
    }

    /// Compute the digest of this record's content; should equal
    /// `self.name.last()` for any well-formed record.
    pub fn content_digest(&self) -> String {
        digest_component(&self.content_bytes())
    }

    /// Deterministically encode this record to its wire form (RM `encode`).
    ///
    /// BCS has no ambiguous encodings for the types used here, so two
    /// semantically equal records always encode to the same bytes.
    pub fn encode(&self) -> Vec<u8> {
        bcs::to_bytes(self).expect("Record serialization is infallible")
    }

    /// Decode a record from its wire form (RM `decode`), checking the
    /// structural invariants that do not require external state:
    /// a parseable shape, a name/digest match, and the
    /// zero-preceding-iff-GENESIS rule.
    pub fn decode(bytes: &[u8]) -> Result<Self, MalformedRecord> {
        let record: Record = bcs::from_bytes(bytes).map_err(|_| MalformedRecord::Undecodable)?;

        let last = record.name.last().ok_or(MalformedRecord::EmptyName)?;
        if last != record.content_digest() {
            return Err(MalformedRecord::DigestMismatch);
        }

        match record.content.record_type {
            RecordType::Genesis if !record.content.preceding.is_empty() => {
                return Err(MalformedRecord::GenesisWithPreceding);
            }
            t if !t.is_genesis() && record.content.preceding.is_empty() => {
                return Err(MalformedRecord::NonGenesisWithoutPreceding);
            }
            _ => {}
        }

        Ok(record)
    }

    /// Build the record name from a multicast prefix and the content's own
    /// digest: `<mcPrefix>/<producerIdentity>/<digest>`.
    pub fn compute_name(mc_prefix: &Name, content: &RecordContent) -> Name {
        let content_bytes = bcs::to_bytes(content).expect("RecordContent serialization is infallible");
        mc_prefix.join(&content.producer).append(digest_component(&content_bytes))
    }
}
