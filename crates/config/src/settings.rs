use std::{path::PathBuf, time::Duration};

use dledger_types::Name;
use serde::{Deserialize, Serialize};

use crate::{cli::Cli, error::ConfigError};

/// TOML-shaped settings, every field defaultable so a config file only
/// needs to state what it overrides.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
struct RawSettings {
    multicast_prefix: Option<String>,
    peer_prefix: Option<String>,
    preceding_record_num: usize,
    append_weight: usize,
    contribution_weight: usize,
    confirm_weight: usize,
    using_contribution_policy: bool,
    trust_anchor_cert_path: Option<PathBuf>,
    starting_peer_cert_paths: Vec<PathBuf>,
    genesis_num: usize,
    record_gen_freq_secs: u64,
    sync_freq_secs: u64,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            multicast_prefix: None,
            peer_prefix: None,
            preceding_record_num: 2,
            append_weight: 1,
            contribution_weight: 2,
            confirm_weight: 3,
            using_contribution_policy: false,
            trust_anchor_cert_path: None,
            starting_peer_cert_paths: Vec::new(),
            genesis_num: 1,
            record_gen_freq_secs: 5,
            sync_freq_secs: 15,
        }
    }
}

/// Fully resolved configuration a `dledger-node` process runs with.
#[derive(Debug, Clone)]
pub struct DlConfig {
    pub multicast_prefix: Name,
    pub peer_prefix: Name,
    pub preceding_record_num: usize,
    pub append_weight: usize,
    pub contribution_weight: usize,
    pub confirm_weight: usize,
    pub using_contribution_policy: bool,
    pub trust_anchor_cert_path: Option<PathBuf>,
    pub starting_peer_cert_paths: Vec<PathBuf>,
    pub genesis_num: usize,
    pub record_gen_freq: Duration,
    pub sync_freq: Duration,
    pub log_directive: String,
}

impl DlConfig {
    /// Load an optional TOML file (`--config`), then apply CLI flags on top
    /// (CLI always wins over the file; the file always wins over defaults).
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = &cli.config {
            builder = builder.add_source(config::File::from(path.clone()));
        }
        let mut raw: RawSettings = builder.build()?.try_deserialize()?;

        if let Some(mc) = &cli.multicast_prefix {
            raw.multicast_prefix = Some(mc.clone());
        }
        if let Some(peer) = &cli.peer_prefix {
            raw.peer_prefix = Some(peer.clone());
        }
        if let Some(n) = cli.preceding_record_num {
            raw.preceding_record_num = n;
        }
        if let Some(w) = cli.confirm_weight {
            raw.confirm_weight = w;
        }
        if let Some(w) = cli.contribution_weight {
            raw.contribution_weight = w;
        }
        if let Some(b) = cli.using_contribution_policy {
            raw.using_contribution_policy = b;
        }
        if let Some(n) = cli.genesis_num {
            raw.genesis_num = n;
        }
        if let Some(s) = cli.record_gen_freq_secs {
            raw.record_gen_freq_secs = s;
        }
        if let Some(s) = cli.sync_freq_secs {
            raw.sync_freq_secs = s;
        }

        let multicast_prefix =
            raw.multicast_prefix.as_deref().map(parse_name_arg).ok_or(ConfigError::MissingIdentity)?;
        let peer_prefix =
            raw.peer_prefix.as_deref().map(parse_name_arg).ok_or(ConfigError::MissingIdentity)?;

        Ok(Self {
            multicast_prefix,
            peer_prefix,
            preceding_record_num: raw.preceding_record_num,
            append_weight: raw.append_weight,
            contribution_weight: raw.contribution_weight,
            confirm_weight: raw.confirm_weight,
            using_contribution_policy: raw.using_contribution_policy,
            trust_anchor_cert_path: raw.trust_anchor_cert_path,
            starting_peer_cert_paths: raw.starting_peer_cert_paths,
            genesis_num: raw.genesis_num,
            record_gen_freq: Duration::from_secs(raw.record_gen_freq_secs),
            sync_freq: Duration::from_secs(raw.sync_freq_secs),
            log_directive: cli.log_directive.clone(),
        })
    }
}

/// Parse a slash-separated CLI/TOML name like "/dledger/fed-1" into a
/// `Name`. Boundary parsing of user-supplied configuration text, not the
/// string-scanning over `Name`s the core avoids everywhere else.
fn parse_name_arg(s: &str) -> Name {
    Name::from_components(s.split('/').filter(|c| !c.is_empty()))
}
