use async_trait::async_trait;
use dledger_types::Name;
use thiserror::Error;

/// Failure modes for the external named-data transport. The gossip crate
/// never depends on a concrete NDN library; callers supply an
/// implementation of [`Transport`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport request for {0} timed out")]
    Timeout(Name),
    #[error("transport is unavailable: {0}")]
    Unavailable(String),
}

/// Object-safe abstraction over the named-data fabric the gossip protocol
/// runs on top of.
///
/// Two simplifications natural in async Rust relative to a callback-style
/// named-data client: `fetch` folds an interest expression and its data
/// callback into a single awaited call, and inbound NOTIF/SYNC/FETCH
/// delivery is modeled as messages the driving loop receives rather than a
/// registered callback — see [`crate::Inbound`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// FETCH: request the wire bytes for `name`. `Ok(None)` is a cache miss
    /// at the remote end, not an error.
    async fn fetch(&self, name: &Name) -> Result<Option<Vec<u8>>, TransportError>;

    /// Publish `data` under `name` — used for both NOTIF and SYNC names,
    /// whose own components already carry the message; `data` is the
    /// record's wire bytes for NOTIF and empty for SYNC.
    async fn put(&self, name: &Name, data: Vec<u8>) -> Result<(), TransportError>;
}
