use std::sync::Arc;

use storage::store::ContextProvider;
use study_core::model::NewContext;
use study_core::registry::ContentRegistry;

/// Supplies new contexts to a store by looking the requested child up in
/// the content registry.
///
/// The store hands over the parent's identifier path and the missing
/// child's identifier; the matching content node — if the registry has one —
/// becomes the creation record. Paths the registry does not know stay
/// unresolved, which the store reports as not-found.
#[derive(Clone)]
pub struct RegistryContextProvider {
    registry: Arc<ContentRegistry>,
}

impl RegistryContextProvider {
    #[must_use]
    pub fn new(registry: Arc<ContentRegistry>) -> Self {
        Self { registry }
    }
}

impl ContextProvider for RegistryContextProvider {
    fn context_for(&self, identifier: &str, parent_path: &[String]) -> Option<NewContext> {
        let mut path = parent_path.to_vec();
        path.push(identifier.to_owned());
        let node = self.registry.node_at(&path)?;
        Some(NewContext::from_node(&node))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    const HAMLET: &str = r#"{
        "identifier": "hamlet",
        "title": "Hamlet",
        "displayOrder": 1,
        "typeInt": 11,
        "children": [
            {"identifier": "act-1", "title": "Act 1", "displayOrder": 1, "typeInt": 2}
        ]
    }"#;

    #[test]
    fn known_children_become_creation_records() {
        let mut registry = ContentRegistry::new();
        registry.add_json("hamlet.json", HAMLET).unwrap();
        let provider = RegistryContextProvider::new(Arc::new(registry));

        let record = provider
            .context_for("act-1", &["hamlet".to_owned()])
            .unwrap();
        assert_eq!(record.identifier, "act-1");
        assert_eq!(record.title, "Act 1");

        let root = provider.context_for("hamlet", &[]).unwrap();
        assert_eq!(root.title, "Hamlet");
    }

    #[test]
    fn unknown_children_are_not_fabricated() {
        let mut registry = ContentRegistry::new();
        registry.add_json("hamlet.json", HAMLET).unwrap();
        let provider = RegistryContextProvider::new(Arc::new(registry));

        assert!(provider.context_for("act-9", &["hamlet".to_owned()]).is_none());
        assert!(provider.context_for("othello", &[]).is_none());
    }
}
