use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered list of identifiers locating a node from the root of the content
/// tree, root-first.
///
/// Paths are the sole addressing mechanism across the crate: the index, the
/// progress store, and the services all speak in identifier paths. An empty
/// path addresses the synthetic super-root whose children are all registered
/// root models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentifierPath(Vec<String>);

impl IdentifierPath {
    /// The empty path, addressing the synthetic super-root.
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from an ordered list of segments, root-first.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// The path one level deeper, ending in `segment`.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// The path of the parent, or `None` for the root path.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    /// Drops the single synthetic application segment that external
    /// deep-link inputs prepend.
    ///
    /// Paths handed to this crate's own APIs are already application-free;
    /// call this only on paths received from the outside.
    #[must_use]
    pub fn without_application_prefix(&self) -> Self {
        Self(self.0.iter().skip(1).cloned().collect())
    }
}

impl fmt::Display for IdentifierPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl From<Vec<String>> for IdentifierPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[String]> for IdentifierPath {
    fn from(segments: &[String]) -> Self {
        Self(segments.to_vec())
    }
}

impl FromIterator<String> for IdentifierPath {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_segments_joined_by_slash() {
        let path = IdentifierPath::from_segments(["hamlet", "act-1", "scene-2"]);
        assert_eq!(path.to_string(), "hamlet/act-1/scene-2");
    }

    #[test]
    fn root_path_is_empty() {
        let path = IdentifierPath::root();
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "");
        assert!(path.parent().is_none());
    }

    #[test]
    fn child_and_parent_round_trip() {
        let acts = IdentifierPath::from_segments(["hamlet", "act-1"]);
        let scene = acts.child("scene-2");
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.last(), Some("scene-2"));
        assert_eq!(scene.parent(), Some(acts));
    }

    #[test]
    fn strips_application_prefix_from_deep_links() {
        let deep_link =
            IdentifierPath::from_segments(["com.example.playbook", "hamlet", "act-1"]);
        let stripped = deep_link.without_application_prefix();
        assert_eq!(stripped.segments(), ["hamlet", "act-1"]);
    }

    #[test]
    fn stripping_the_empty_path_stays_empty() {
        assert!(IdentifierPath::root().without_application_prefix().is_empty());
    }
}
