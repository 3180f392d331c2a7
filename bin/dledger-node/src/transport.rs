use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use dledger_gossip::{Transport, TransportError};
use dledger_types::Name;

/// In-memory `Transport` standing in for a real NDN deployment: `put`
/// writes into a shared map, `fetch` reads it back. Enough to make a single
/// node (or a handful wired to the same instance) runnable without a real
/// transport library.
#[derive(Default)]
pub struct InMemoryTransport {
    published: Mutex<HashMap<Name, Vec<u8>>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn fetch(&self, name: &Name) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(self.published.lock().unwrap().get(name).cloned())
    }

    async fn put(&self, name: &Name, data: Vec<u8>) -> Result<(), TransportError> {
        self.published.lock().unwrap().insert(name.clone(), data);
        Ok(())
    }
}
