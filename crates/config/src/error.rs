use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("multicast_prefix and peer_prefix must be set, via config file or --multicast-prefix/--peer-prefix")]
    MissingIdentity,
}
