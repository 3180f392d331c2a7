use std::path::PathBuf;

use clap::Parser;

/// CLI surface for `dledger-node`; any flag given here overrides the same
/// key loaded from `--config`'s TOML file.
#[derive(Parser, Debug)]
#[command(author, version, about = "DLedger node", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Federation multicast prefix, e.g. "/dledger/fed-1".
    #[arg(long)]
    pub multicast_prefix: Option<String>,

    /// Local producer identity prefix, e.g. "/dledger/fed-1/alice".
    #[arg(long)]
    pub peer_prefix: Option<String>,

    #[arg(long)]
    pub preceding_record_num: Option<usize>,

    #[arg(long)]
    pub confirm_weight: Option<usize>,

    #[arg(long)]
    pub contribution_weight: Option<usize>,

    #[arg(long)]
    pub using_contribution_policy: Option<bool>,

    #[arg(long)]
    pub genesis_num: Option<usize>,

    #[arg(long)]
    pub record_gen_freq_secs: Option<u64>,

    #[arg(long)]
    pub sync_freq_secs: Option<u64>,

    /// Tracing filter directive, e.g. "info" or "dledger_admission=debug".
    #[arg(short = 'v', long, default_value = "info")]
    pub log_directive: String,
}
