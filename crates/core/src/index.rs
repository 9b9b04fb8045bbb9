//! Resolution of identifier paths against a content tree.

use crate::model::ContentNode;

/// Resolve an identifier path against a set of sibling nodes, root-first.
///
/// At each step the current siblings are searched for the leading segment;
/// a miss resolves to `None`. A single remaining segment resolves to the
/// match itself, otherwise resolution recurses into the match's children —
/// so a path that runs past a leaf is `None` as well.
///
/// An empty path is `None` here; the synthetic super-root is the registry's
/// business, not the index's. Duplicate sibling identifiers are a load-time
/// invariant the index assumes holds.
#[must_use]
pub fn resolve<'a>(path: &[String], nodes: &'a [ContentNode]) -> Option<&'a ContentNode> {
    let (first, rest) = path.split_first()?;
    let node = nodes.iter().find(|node| node.identifier() == first)?;
    if rest.is_empty() {
        return Some(node);
    }
    resolve(rest, node.children())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeDraft;

    fn sample_tree() -> Vec<ContentNode> {
        let json = r#"{
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
        vec![
            serde_json::from_str::<NodeDraft>(json)
                .unwrap()
                .validate()
                .unwrap(),
        ]
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn resolves_nested_paths() {
        let roots = sample_tree();
        let node = resolve(&path(&["hamlet", "act-1", "scene-2"]), &roots).unwrap();
        assert_eq!(node.identifier(), "scene-2");
        assert_eq!(node.title(), "Scene 2");
    }

    #[test]
    fn resolution_is_idempotent() {
        let roots = sample_tree();
        let segments = path(&["hamlet", "act-1"]);
        let first = resolve(&segments, &roots).unwrap();
        let second = resolve(&segments, &roots).unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn unknown_segment_fails() {
        let roots = sample_tree();
        assert!(resolve(&path(&["hamlet", "act-3"]), &roots).is_none());
        assert!(resolve(&path(&["macbeth"]), &roots).is_none());
    }

    #[test]
    fn path_running_past_a_leaf_fails() {
        let roots = sample_tree();
        assert!(resolve(&path(&["hamlet", "act-2", "scene-1"]), &roots).is_none());
        assert!(
            resolve(
                &path(&["hamlet", "act-1", "scene-1", "line-1"]),
                &roots
            )
            .is_none()
        );
    }

    #[test]
    fn empty_path_is_not_resolved_by_the_index() {
        let roots = sample_tree();
        assert!(resolve(&[], &roots).is_none());
    }
}
