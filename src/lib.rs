pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::AccessConfig;
pub use crate::core::resolver::AccessResolver;
pub use domain::{AccessSubject, EntitlementSource, Module, ResolvedAccess, UserOverrideMap};
pub use utils::error::{AccessError, Result};
