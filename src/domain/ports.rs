use crate::domain::model::UserOverrideMap;

/// Source of explicit per-user module grants.
///
/// The static override table implements this; an external entitlement
/// store can replace it without changing how access is resolved.
pub trait EntitlementSource {
    /// Module ids granted to `user_id`, in priority order. Unknown users get none.
    fn grants_for(&self, user_id: &str) -> Vec<String>;
}

impl EntitlementSource for UserOverrideMap {
    fn grants_for(&self, user_id: &str) -> Vec<String> {
        self.get(user_id).map(<[String]>::to_vec).unwrap_or_default()
    }
}

impl<E: EntitlementSource + ?Sized> EntitlementSource for &E {
    fn grants_for(&self, user_id: &str) -> Vec<String> {
        (**self).grants_for(user_id)
    }
}
