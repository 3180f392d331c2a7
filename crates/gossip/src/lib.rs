//! Gossip protocol message shapes, transport contract, and the local
//! producer loop.
#![forbid(unsafe_code)]

mod handlers;
mod message;
mod producer;
mod transport;

pub use handlers::{fetch_missing, handle_notif, handle_sync, serve_fetch, Inbound};
pub use message::{notif_name, record_name_from_notif, sync_names, tips_from_sync, MAX_SYNC_TIPS};
pub use producer::{LocalSigner, ProducerLoop, Tick};
pub use transport::{Transport, TransportError};
