use dledger_store::LedgerEntry;
use dledger_types::Name;
use tracing::info;

/// Called once per entry transitioning to `archived`.
pub trait ArchiveSink {
    fn on_archive(&self, name: &Name, entry: &LedgerEntry);
}

/// Ambient default: logs the archival event. A real deployment would swap
/// this for one that persists entries to disk or forwards them downstream.
pub struct LoggingArchiveSink;

impl ArchiveSink for LoggingArchiveSink {
    fn on_archive(&self, name: &Name, entry: &LedgerEntry) {
        info!(%name, weight = entry.weight(), "record archived");
    }
}
