//! Node configuration surface:
//! TOML settings with CLI overrides.
#![forbid(unsafe_code)]

mod cli;
mod error;
mod settings;

pub use cli::Cli;
pub use error::ConfigError;
pub use settings::DlConfig;
