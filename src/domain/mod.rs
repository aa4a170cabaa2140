pub mod model;
pub mod ports;

pub use model::{
    AccessPolicy, AccessSubject, DepartmentModuleMap, DriftFinding, Module, ModuleCatalog,
    ResolvedAccess, UserOverrideMap,
};
pub use ports::EntitlementSource;
