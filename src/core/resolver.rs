use crate::domain::model::{
    normalize_key, ordered_ids, AccessPolicy, AccessSubject, Module, ModuleCatalog,
    ResolvedAccess, UserOverrideMap,
};
use crate::domain::ports::EntitlementSource;

/// Resolves which modules a user may reach and where they land.
///
/// Every call is a pure function of the arguments and the immutable tables
/// the resolver was built with, so a resolver can be shared across threads
/// freely. Resolution never fails: unknown departments fall back to the
/// default module set and ids missing from the catalog are dropped.
#[derive(Debug, Clone)]
pub struct AccessResolver<E: EntitlementSource = UserOverrideMap> {
    policy: AccessPolicy,
    entitlements: E,
}

impl<E: EntitlementSource> AccessResolver<E> {
    pub fn new(policy: AccessPolicy, entitlements: E) -> Self {
        Self {
            policy,
            entitlements,
        }
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.policy.catalog
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn module(&self, module_id: &str) -> Option<&Module> {
        self.policy.catalog.get(module_id)
    }

    /// Modules visible to the user, in catalog order.
    ///
    /// Elevated users get the whole catalog. Everyone else gets the union of
    /// their department's modules and their explicit grants.
    pub fn resolve_allowed_modules(
        &self,
        department: Option<&str>,
        is_elevated: bool,
        user_id: Option<&str>,
    ) -> Vec<Module> {
        if is_elevated {
            tracing::debug!("elevated subject, returning full catalog");
            return self.policy.catalog.modules().to_vec();
        }

        let granted = self.granted_ids(department, user_id);
        let dropped = self.policy.catalog.unknown(&granted);
        if !dropped.is_empty() {
            tracing::debug!(?dropped, "ignoring module ids missing from the catalog");
        }

        self.policy.catalog.select(&granted)
    }

    /// Whether the department (plus the user's grants) includes `module_id`.
    ///
    /// Takes no elevation flag; use [`AccessResolver::permits`] for subjects
    /// that may be elevated.
    pub fn can_access_module(
        &self,
        department: Option<&str>,
        module_id: &str,
        user_id: Option<&str>,
    ) -> bool {
        let id = normalize_key(module_id);
        if id.is_empty() || !self.policy.catalog.contains(&id) {
            return false;
        }

        self.granted_ids(department, user_id).contains(&id)
    }

    /// Landing route for a non-elevated user.
    pub fn default_route(&self, department: Option<&str>, user_id: Option<&str>) -> String {
        let modules = self.resolve_allowed_modules(department, false, user_id);
        self.first_path_or_fallback(&modules)
    }

    pub fn resolve(&self, subject: &AccessSubject) -> ResolvedAccess {
        let modules = self.resolve_allowed_modules(
            subject.department.as_deref(),
            subject.elevated,
            subject.user_id.as_deref(),
        );
        let default_route = self.first_path_or_fallback(&modules);

        ResolvedAccess {
            modules,
            default_route,
        }
    }

    /// Route guard check. Unlike [`AccessResolver::can_access_module`] this
    /// honors elevation, so it always agrees with [`AccessResolver::resolve`].
    pub fn permits(&self, subject: &AccessSubject, module_id: &str) -> bool {
        if subject.elevated {
            return self.policy.catalog.contains(module_id);
        }

        self.can_access_module(
            subject.department.as_deref(),
            module_id,
            subject.user_id.as_deref(),
        )
    }

    fn department_ids(&self, department: Option<&str>) -> &[String] {
        let key = department.map(normalize_key).unwrap_or_default();
        if key.is_empty() {
            tracing::debug!("no department, using default modules");
            return &self.policy.default_modules;
        }

        match self.policy.departments.get(&key) {
            Some(ids) => ids,
            None => {
                tracing::debug!(department = %key, "unknown department, using default modules");
                &self.policy.default_modules
            }
        }
    }

    // 部門模組在前，個人授權在後，依正規化後的 id 去重
    fn granted_ids(&self, department: Option<&str>, user_id: Option<&str>) -> Vec<String> {
        let overrides = user_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| self.entitlements.grants_for(id))
            .unwrap_or_default();

        ordered_ids(self.department_ids(department).iter().chain(overrides.iter()))
    }

    fn first_path_or_fallback(&self, modules: &[Module]) -> String {
        modules
            .first()
            .map(|module| module.path.clone())
            .unwrap_or_else(|| self.policy.fallback_route.clone())
    }
}
