pub mod resolver;

pub use crate::domain::model::{AccessPolicy, AccessSubject, Module, ResolvedAccess};
pub use crate::domain::ports::EntitlementSource;
pub use crate::utils::error::Result;
