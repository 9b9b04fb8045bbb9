//! Registry of root content models.
//!
//! The registry is an explicitly constructed value owned by the
//! application's composition root: it is loaded once (`&mut self`), then
//! shared read-only — typically behind an `Arc` — with every component that
//! resolves content.

use thiserror::Error;

use crate::index;
use crate::model::{ContentNode, IdentifierPath, NodeDraft, NodeError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("content source {file} is not valid JSON")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Node(#[from] NodeError),
}

//
// ─── REGISTRY ──────────────────────────────────────────────────────────────────
//

/// Holds one root content model per registered source file.
///
/// Each source contributes exactly one independent root, keyed by its root
/// identifier. Re-registering a file name or a root identifier is ignored —
/// first registration wins.
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    sources: Vec<String>,
    roots: Vec<ContentNode>,
}

impl ContentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-validated root model.
    ///
    /// Returns `false` without registering when a root with the same
    /// identifier is already present.
    pub fn add_root(&mut self, root: ContentNode) -> bool {
        if self.contains_root(root.identifier()) {
            return false;
        }
        self.roots.push(root);
        true
    }

    /// Decode, validate, and register the root model in a JSON source.
    ///
    /// The source is read once: a `file` name seen before is skipped, as is
    /// a root whose identifier is already registered (both return
    /// `Ok(false)`).
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Json` when the source does not decode and
    /// `RegistryError::Node` when the decoded tree fails validation.
    pub fn add_json(&mut self, file: &str, json: &str) -> Result<bool, RegistryError> {
        if self.sources.iter().any(|known| known == file) {
            return Ok(false);
        }
        let draft: NodeDraft =
            serde_json::from_str(json).map_err(|source| RegistryError::Json {
                file: file.to_owned(),
                source,
            })?;
        let root = draft.validate()?;
        self.sources.push(file.to_owned());
        Ok(self.add_root(root))
    }

    #[must_use]
    pub fn roots(&self) -> &[ContentNode] {
        &self.roots
    }

    #[must_use]
    pub fn contains_root(&self, identifier: &str) -> bool {
        self.roots
            .iter()
            .any(|root| root.identifier() == identifier)
    }

    /// The content node at the given identifier path.
    ///
    /// The empty path addresses the synthetic super-root, whose children are
    /// all registered roots — callers asking for the top level get an
    /// aggregate node rather than a miss. Returned nodes are clones; the
    /// registry itself stays immutable.
    #[must_use]
    pub fn node_at(&self, path: &[String]) -> Option<ContentNode> {
        if path.is_empty() {
            return Some(ContentNode::synthetic_root(self.roots.clone()));
        }
        index::resolve(path, &self.roots).cloned()
    }

    /// Identifier paths of every leaf in every registered root, depth-first
    /// in model order. Declaring these paths forces the full tree into a
    /// store, since every ancestor is created along the way.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<IdentifierPath> {
        let mut paths = Vec::new();
        for root in &self.roots {
            collect_leaf_paths(root, &IdentifierPath::root(), &mut paths);
        }
        paths
    }
}

fn collect_leaf_paths(node: &ContentNode, prefix: &IdentifierPath, out: &mut Vec<IdentifierPath>) {
    let path = prefix.child(node.identifier());
    if node.is_leaf() {
        out.push(path);
        return;
    }
    for child in node.children() {
        collect_leaf_paths(child, &path, out);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;

    const HAMLET: &str = r#"{
        "identifier": "hamlet",
        "title": "Hamlet",
        "displayOrder": 1,
        "typeInt": 11,
        "children": [
            {
                "identifier": "act-1",
                "title": "Act 1",
                "displayOrder": 1,
                "typeInt": 2,
                "children": [
                    {"identifier": "scene-1", "title": "Scene 1", "displayOrder": 1, "typeInt": 3},
                    {"identifier": "scene-2", "title": "Scene 2", "displayOrder": 2, "typeInt": 3}
                ]
            },
            {"identifier": "act-2", "title": "Act 2", "displayOrder": 2, "typeInt": 2}
        ]
    }"#;

    const MACBETH: &str = r#"{
        "identifier": "macbeth",
        "title": "Macbeth",
        "displayOrder": 2,
        "typeInt": 11,
        "children": [
            {"identifier": "act-1", "title": "Act 1", "displayOrder": 1, "typeInt": 2}
        ]
    }"#;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn registers_one_root_per_source() {
        let mut registry = ContentRegistry::new();
        assert!(registry.add_json("hamlet.json", HAMLET).unwrap());
        assert!(registry.add_json("macbeth.json", MACBETH).unwrap());
        assert_eq!(registry.roots().len(), 2);
        assert!(registry.contains_root("hamlet"));
        assert!(registry.contains_root("macbeth"));
    }

    #[test]
    fn same_file_is_read_only_once() {
        let mut registry = ContentRegistry::new();
        assert!(registry.add_json("hamlet.json", HAMLET).unwrap());
        assert!(!registry.add_json("hamlet.json", HAMLET).unwrap());
        assert_eq!(registry.roots().len(), 1);
    }

    #[test]
    fn duplicate_root_identifier_keeps_first_registration() {
        let retitled = HAMLET.replace("\"title\": \"Hamlet\"", "\"title\": \"Hamlet (Folio)\"");

        let mut registry = ContentRegistry::new();
        assert!(registry.add_json("hamlet.json", HAMLET).unwrap());
        assert!(!registry.add_json("hamlet-folio.json", &retitled).unwrap());

        assert_eq!(registry.roots().len(), 1);
        assert_eq!(registry.roots()[0].title(), "Hamlet");
    }

    #[test]
    fn malformed_json_is_an_explicit_error() {
        let mut registry = ContentRegistry::new();
        let err = registry.add_json("broken.json", "{not json").unwrap_err();
        assert!(matches!(err, RegistryError::Json { file, .. } if file == "broken.json"));
        // A failed source can be retried under the same name.
        assert!(registry.add_json("broken.json", HAMLET).unwrap());
    }

    #[test]
    fn node_at_resolves_registered_content() {
        let mut registry = ContentRegistry::new();
        registry.add_json("hamlet.json", HAMLET).unwrap();

        let scene = registry.node_at(&path(&["hamlet", "act-1", "scene-2"])).unwrap();
        assert_eq!(scene.title(), "Scene 2");
        assert!(registry.node_at(&path(&["hamlet", "act-9"])).is_none());
    }

    #[test]
    fn empty_path_yields_the_synthetic_super_root() {
        let mut registry = ContentRegistry::new();
        registry.add_json("hamlet.json", HAMLET).unwrap();
        registry.add_json("macbeth.json", MACBETH).unwrap();

        let super_root = registry.node_at(&[]).unwrap();
        assert_eq!(super_root.identifier(), "");
        assert_eq!(super_root.node_type(), NodeType::App);
        let titles: Vec<_> = super_root
            .children()
            .iter()
            .map(ContentNode::title)
            .collect();
        assert_eq!(titles, ["Hamlet", "Macbeth"]);
    }

    #[test]
    fn leaf_paths_cover_every_branch_bottom() {
        let mut registry = ContentRegistry::new();
        registry.add_json("hamlet.json", HAMLET).unwrap();
        registry.add_json("macbeth.json", MACBETH).unwrap();

        let paths: Vec<String> = registry
            .leaf_paths()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            paths,
            [
                "hamlet/act-1/scene-1",
                "hamlet/act-1/scene-2",
                "hamlet/act-2",
                "macbeth/act-1",
            ]
        );
    }
}
