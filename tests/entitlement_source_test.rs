use module_access::{AccessConfig, AccessResolver, AccessSubject, EntitlementSource};
use std::collections::HashMap;

/// Grants loaded from somewhere other than the policy file.
struct ExternalGrants {
    records: HashMap<String, Vec<String>>,
}

impl EntitlementSource for ExternalGrants {
    fn grants_for(&self, user_id: &str) -> Vec<String> {
        self.records.get(user_id).cloned().unwrap_or_default()
    }
}

#[test]
fn test_external_entitlements_replace_override_table() {
    let (policy, overrides) = AccessConfig::builtin().unwrap().into_parts().unwrap();
    assert_eq!(overrides.len(), 1);

    let grants = ExternalGrants {
        records: HashMap::from([(
            "emp-42".to_string(),
            vec!["Accounting".to_string(), " inventory".to_string(), "ghost".to_string()],
        )]),
    };
    let resolver = AccessResolver::new(policy, grants);

    let access = resolver.resolve(&AccessSubject::new(Some("Marketing")).with_user("emp-42"));
    assert_eq!(
        access.module_ids(),
        vec!["crm", "tasks", "accounting", "content", "inventory", "social"]
    );
    assert_eq!(access.default_route, "/crm");
    assert!(resolver.can_access_module(Some("Marketing"), "ACCOUNTING", Some("emp-42")));
    assert!(!resolver.can_access_module(Some("Marketing"), "ghost", Some("emp-42")));

    // the override table is no longer consulted
    let table_user = "3f6c1d2e-8a41-4b7e-9c55-0d2f7a91b6e4";
    assert!(!resolver.can_access_module(Some("hr"), "sales", Some(table_user)));
}

#[test]
fn test_borrowed_source_works_as_entitlements() {
    let (policy, overrides) = AccessConfig::builtin().unwrap().into_parts().unwrap();
    let resolver = AccessResolver::new(policy, &overrides);

    let user = "3f6c1d2e-8a41-4b7e-9c55-0d2f7a91b6e4";
    assert!(resolver.can_access_module(Some("hr"), "crm", Some(user)));
    assert!(!resolver.can_access_module(Some("hr"), "crm", None));
}
