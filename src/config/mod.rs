pub mod access_config;
#[cfg(feature = "cli")]
pub mod cli;

pub use access_config::{AccessConfig, DefaultsConfig, BUILTIN_POLICY};
#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, SubjectArgs};
