mod archive;
mod keys;
mod transport;

use clap::Parser;
use dledger_admission::{AdmissionConfig, AdmissionEngine};
use dledger_config::{Cli, DlConfig};
use dledger_gossip::{fetch_missing, LocalSigner, ProducerLoop, Tick};
use dledger_identity::{CertList, Certificate};
use dledger_store::DagStore;
use dledger_types::{PayloadItem, RecordType};
use fastcrypto::traits::{KeyPair, Signer as FastCryptoSigner};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{archive::ArchiveSink, transport::InMemoryTransport};

/// Payload tag distinguishing otherwise-identical genesis records minted in
/// the same bootstrap batch; each one carries its own ordinal so the name
/// digest (computed over content, not over any hidden counter) differs per
/// index instead of collapsing `genesis_num` mints into a single tip.
const GENESIS_INDEX_TAG: u8 = 0;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::new(&cli.log_directive)).init();

    let config = DlConfig::load(&cli)?;
    info!(multicast_prefix = %config.multicast_prefix, peer_prefix = %config.peer_prefix, "starting dledger-node");

    // This reference binary plays both trust anchor and sole producer for a
    // single-process run; a real deployment keeps the anchor's key offline
    // and loads only `identity_keypair` locally.
    let anchor_keypair = keys::load_or_generate(config.trust_anchor_cert_path.as_deref())?;
    let identity_keypair = keys::load_or_generate(None)?;

    let mut certs = CertList::new(anchor_keypair.public().clone());
    let mut self_cert = Certificate {
        full_name: config.peer_prefix.append("cert"),
        identity: config.peer_prefix.clone(),
        public_key: identity_keypair.public().clone(),
        issued_at: 0,
        anchor_signature: anchor_keypair.sign(&[]),
    };
    self_cert.anchor_signature = anchor_keypair.sign(&self_cert.signed_bytes());
    certs.insert(self_cert)?;

    let signer = LocalSigner::new(config.peer_prefix.clone(), identity_keypair);
    let mut store = DagStore::new();
    let mut awe = AdmissionEngine::new(
        AdmissionConfig::new(config.multicast_prefix.clone(), config.preceding_record_num, config.confirm_weight)
            .with_contribution_policy(config.using_contribution_policy, config.contribution_weight),
    );

    for i in 0..config.genesis_num {
        let payload = vec![PayloadItem::new(GENESIS_INDEX_TAG, (i as u32).to_le_bytes().to_vec())];
        let genesis = signer.sign_record(&config.multicast_prefix, vec![], RecordType::Genesis, payload);
        awe.admit(genesis, &mut store, &certs);
    }
    info!(tips = store.tip_count(), "minted genesis records");

    let transport = InMemoryTransport::new();
    let sink = archive::LoggingArchiveSink;
    let mut producer =
        ProducerLoop::new(config.multicast_prefix.clone(), config.preceding_record_num, config.record_gen_freq, config.sync_freq);

    run(&mut producer, &signer, &transport, &sink, &mut awe, &mut store, &certs).await
}

/// The single cooperative event loop: only suspension points are the
/// producer loop's timers and outbound transport calls, and each iteration
/// runs an admission/propagation step to completion before the next select.
async fn run(
    producer: &mut ProducerLoop,
    signer: &LocalSigner,
    transport: &InMemoryTransport,
    sink: &dyn ArchiveSink,
    awe: &mut AdmissionEngine,
    store: &mut DagStore,
    certs: &CertList,
) -> eyre::Result<()> {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown signal received, stopping event loop");
                return Ok(());
            }
            tick = producer.tick() => match tick {
                Tick::RecordGen => {
                    if let Some(name) =
                        producer.generate_record(signer, vec![], transport, awe, store, certs).await
                    {
                        info!(%name, "generated and broadcast record");
                    }
                    for (name, entry) in store.archived_export() {
                        sink.on_archive(&name, &entry);
                    }
                }
                Tick::Sync => {
                    producer.sync_tick(transport, store).await;
                    if awe.has_backlog() {
                        let backlog: Vec<_> = awe.missing().cloned().collect();
                        fetch_missing(transport, awe, store, certs, backlog).await;
                    }
                }
            },
        }
    }
}
