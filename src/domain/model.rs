use crate::utils::error::{AccessError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_route, validate_slug};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Normalized form used for department names and module ids: trimmed, lowercase.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalizes and deduplicates ids, keeping first-seen order. Blank ids are dropped.
pub fn ordered_ids<I, S>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for id in ids {
        let key = normalize_key(id.as_ref());
        if !key.is_empty() && seen.insert(key.clone()) {
            ordered.push(key);
        }
    }
    ordered
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub path: String,
}

/// Static module catalog. Declaration order is the order of every result.
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    modules: Vec<Module>,
    index: HashMap<String, usize>,
}

impl ModuleCatalog {
    pub fn new(modules: Vec<Module>) -> Result<Self> {
        if modules.is_empty() {
            return Err(AccessError::MissingConfigError {
                field: "modules".to_string(),
            });
        }

        let mut normalized = Vec::with_capacity(modules.len());
        let mut index = HashMap::with_capacity(modules.len());

        for (position, module) in modules.into_iter().enumerate() {
            let id = normalize_key(&module.id);
            validate_slug("modules.id", &id)?;
            validate_non_empty_string(&format!("modules.{}.title", id), &module.title)?;
            validate_route(&format!("modules.{}.path", id), &module.path)?;

            if index.insert(id.clone(), position).is_some() {
                return Err(AccessError::DuplicateEntryError {
                    field: "modules".to_string(),
                    value: id,
                });
            }

            normalized.push(Module {
                id,
                title: module.title.trim().to_string(),
                path: module.path,
            });
        }

        Ok(Self {
            modules: normalized,
            index,
        })
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Module> {
        self.index
            .get(&normalize_key(id))
            .map(|&position| &self.modules[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Catalog entries whose id is in `ids`, in catalog order. Unknown ids are ignored.
    pub fn select(&self, ids: &[String]) -> Vec<Module> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        self.modules
            .iter()
            .filter(|module| wanted.contains(module.id.as_str()))
            .cloned()
            .collect()
    }

    /// Ids in `ids` that the catalog does not know.
    pub fn unknown<'a>(&self, ids: &'a [String]) -> Vec<&'a str> {
        ids.iter()
            .map(String::as_str)
            .filter(|id| !self.index.contains_key(*id))
            .collect()
    }
}

/// Department name -> ordered module ids. Keys and ids are stored normalized.
#[derive(Debug, Clone, Default)]
pub struct DepartmentModuleMap {
    entries: HashMap<String, Vec<String>>,
}

impl DepartmentModuleMap {
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut map = HashMap::new();
        for (department, ids) in entries {
            let key = normalize_key(&department);
            validate_non_empty_string("departments", &key)?;

            if map.insert(key.clone(), ordered_ids(ids)).is_some() {
                return Err(AccessError::DuplicateEntryError {
                    field: "departments".to_string(),
                    value: key,
                });
            }
        }
        Ok(Self { entries: map })
    }

    pub fn get(&self, department: &str) -> Option<&[String]> {
        self.entries
            .get(&normalize_key(department))
            .map(Vec::as_slice)
    }

    /// Department names, sorted.
    pub fn departments(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-user grants layered on top of department defaults.
/// User ids are matched exactly after trimming.
#[derive(Debug, Clone, Default)]
pub struct UserOverrideMap {
    grants: HashMap<String, Vec<String>>,
}

impl UserOverrideMap {
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut grants = HashMap::new();
        for (user_id, ids) in entries {
            let key = user_id.trim().to_string();
            validate_non_empty_string("overrides", &key)?;

            if grants.insert(key.clone(), ordered_ids(ids)).is_some() {
                return Err(AccessError::DuplicateEntryError {
                    field: "overrides".to_string(),
                    value: key,
                });
            }
        }
        Ok(Self { grants })
    }

    pub fn get(&self, user_id: &str) -> Option<&[String]> {
        self.grants.get(user_id.trim()).map(Vec::as_slice)
    }

    pub fn users(&self) -> Vec<&str> {
        let mut users: Vec<&str> = self.grants.keys().map(String::as_str).collect();
        users.sort_unstable();
        users
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

/// Immutable access tables shared by every resolution call.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    pub catalog: ModuleCatalog,
    pub departments: DepartmentModuleMap,
    /// Used when the department is missing, blank or not configured.
    pub default_modules: Vec<String>,
    /// Landing route when nothing resolves.
    pub fallback_route: String,
}

impl AccessPolicy {
    /// Ids referenced by the defaults or a department that the catalog lacks.
    pub fn drift(&self) -> Vec<DriftFinding> {
        let mut findings: Vec<DriftFinding> = self
            .catalog
            .unknown(&self.default_modules)
            .into_iter()
            .map(|id| DriftFinding::new("defaults.modules", id))
            .collect();

        for department in self.departments.departments() {
            let ids = self.departments.get(department).unwrap_or_default();
            findings.extend(
                self.catalog
                    .unknown(ids)
                    .into_iter()
                    .map(|id| DriftFinding::new(format!("departments.{}", department), id)),
            );
        }
        findings
    }
}

/// A configured module id with no catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftFinding {
    pub source: String,
    pub module_id: String,
}

impl DriftFinding {
    pub fn new(source: impl Into<String>, module_id: &str) -> Self {
        Self {
            source: source.into(),
            module_id: module_id.to_string(),
        }
    }
}

/// Identity attributes supplied by the calling layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessSubject {
    pub department: Option<String>,
    pub elevated: bool,
    pub user_id: Option<String>,
}

impl AccessSubject {
    pub fn new(department: Option<&str>) -> Self {
        Self {
            department: department.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn elevated(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAccess {
    pub modules: Vec<Module>,
    pub default_route: String,
}

impl ResolvedAccess {
    pub fn module_ids(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.id.as_str()).collect()
    }

    pub fn contains(&self, module_id: &str) -> bool {
        let id = normalize_key(module_id);
        self.modules.iter().any(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: &str, path: &str) -> Module {
        Module {
            id: id.to_string(),
            title: id.to_uppercase(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_ordered_ids_dedup_keeps_first_seen() {
        let ids = ordered_ids([" Sales", "crm", "SALES ", "", "hr", "crm"]);
        assert_eq!(ids, vec!["sales", "crm", "hr"]);
    }

    #[test]
    fn test_catalog_normalizes_ids_and_rejects_duplicates() {
        let catalog =
            ModuleCatalog::new(vec![module(" Sales ", "/sales"), module("crm", "/crm")]).unwrap();
        assert_eq!(catalog.modules()[0].id, "sales");
        assert!(catalog.contains("SALES"));
        assert_eq!(catalog.get(" crm ").map(|m| m.path.as_str()), Some("/crm"));

        let err = ModuleCatalog::new(vec![module("crm", "/crm"), module("CRM", "/crm2")]).unwrap_err();
        assert!(matches!(err, AccessError::DuplicateEntryError { .. }));
    }

    #[test]
    fn test_catalog_rejects_bad_entries() {
        assert!(ModuleCatalog::new(vec![]).is_err());
        assert!(ModuleCatalog::new(vec![module("sales", "sales")]).is_err());
        assert!(ModuleCatalog::new(vec![module("", "/x")]).is_err());
    }

    #[test]
    fn test_select_uses_catalog_order() {
        let catalog = ModuleCatalog::new(vec![
            module("sales", "/sales"),
            module("crm", "/crm"),
            module("hr", "/hr"),
        ])
        .unwrap();

        let ids = vec!["hr".to_string(), "ghost".to_string(), "sales".to_string()];
        let selected: Vec<String> = catalog.select(&ids).into_iter().map(|m| m.id).collect();
        assert_eq!(selected, vec!["sales", "hr"]);
        assert_eq!(catalog.unknown(&ids), vec!["ghost"]);
    }

    #[test]
    fn test_department_keys_are_normalized() {
        let map = DepartmentModuleMap::from_entries(vec![(
            " HR ".to_string(),
            vec!["HR".to_string(), "tasks".to_string()],
        )])
        .unwrap();
        assert_eq!(map.get("hr"), Some(&["hr".to_string(), "tasks".to_string()][..]));
        assert_eq!(map.get("  Hr"), map.get("hr"));

        let dup = DepartmentModuleMap::from_entries(vec![
            ("Sales".to_string(), vec![]),
            ("sales".to_string(), vec![]),
        ]);
        assert!(dup.is_err());
    }

    #[test]
    fn test_override_user_ids_are_trimmed_not_lowercased() {
        let map = UserOverrideMap::from_entries(vec![(
            " User-A ".to_string(),
            vec!["crm".to_string()],
        )])
        .unwrap();
        assert!(map.get("User-A").is_some());
        assert!(map.get("user-a").is_none());
        assert!(UserOverrideMap::from_entries(vec![("  ".to_string(), vec![])]).is_err());
    }

    #[test]
    fn test_subject_builder() {
        let subject = AccessSubject::new(Some("Sales")).elevated(true).with_user("u1");
        assert_eq!(subject.department.as_deref(), Some("Sales"));
        assert!(subject.elevated);
        assert_eq!(subject.user_id.as_deref(), Some("u1"));
    }
}
