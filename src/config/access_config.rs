use crate::core::resolver::AccessResolver;
use crate::domain::model::{
    ordered_ids, AccessPolicy, DepartmentModuleMap, DriftFinding, Module, ModuleCatalog,
    UserOverrideMap,
};
use crate::utils::error::Result;
use crate::utils::validation::{validate_route, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Access policy shipped with the application.
pub const BUILTIN_POLICY: &str = include_str!("builtin.toml");

pub const DEFAULT_FALLBACK_ROUTE: &str = "/user-dashboard";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    pub defaults: DefaultsConfig,
    pub modules: Vec<Module>,
    #[serde(default)]
    pub departments: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub overrides: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub modules: Vec<String>,
    #[serde(default = "default_fallback_route")]
    pub fallback_route: String,
}

fn default_fallback_route() -> String {
    DEFAULT_FALLBACK_ROUTE.to_string()
}

impl AccessConfig {
    /// 從 TOML 檔案載入存取策略
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        tracing::info!("Loaded access policy from {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析存取策略
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_POLICY)
    }

    /// Loads `path` when given, otherwise the built-in policy.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    /// Validates and normalizes into the immutable tables used for resolution.
    pub fn into_parts(self) -> Result<(AccessPolicy, UserOverrideMap)> {
        validate_route("defaults.fallback_route", &self.defaults.fallback_route)?;

        let catalog = ModuleCatalog::new(self.modules)?;
        let departments = DepartmentModuleMap::from_entries(self.departments)?;
        let overrides = UserOverrideMap::from_entries(self.overrides)?;

        let policy = AccessPolicy {
            catalog,
            departments,
            default_modules: ordered_ids(&self.defaults.modules),
            fallback_route: self.defaults.fallback_route,
        };
        Ok((policy, overrides))
    }

    /// Builds a resolver. Drift is logged, not rejected.
    pub fn into_resolver(self) -> Result<AccessResolver> {
        let (policy, overrides) = self.into_parts()?;

        for finding in collect_drift(&policy, &overrides) {
            tracing::warn!(
                "⚠️ {} references unknown module '{}', it will be ignored",
                finding.source,
                finding.module_id
            );
        }

        tracing::info!(
            modules = policy.catalog.len(),
            departments = policy.departments.len(),
            overrides = overrides.len(),
            "Access policy ready"
        );

        Ok(AccessResolver::new(policy, overrides))
    }

    /// Module ids referenced by defaults, departments or overrides that the catalog lacks.
    pub fn drift_report(&self) -> Result<Vec<DriftFinding>> {
        let (policy, overrides) = self.clone().into_parts()?;
        Ok(collect_drift(&policy, &overrides))
    }
}

fn collect_drift(policy: &AccessPolicy, overrides: &UserOverrideMap) -> Vec<DriftFinding> {
    let mut findings = policy.drift();
    for user in overrides.users() {
        let ids = overrides.get(user).unwrap_or_default();
        findings.extend(
            policy
                .catalog
                .unknown(ids)
                .into_iter()
                .map(|id| DriftFinding::new(format!("overrides.{}", user), id)),
        );
    }
    findings
}

impl Validate for AccessConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_parts().map(|_| ())
    }
}
