use std::fmt;

use url::Url;

use crate::model::activity::Activity;
use crate::model::node::{ContentNode, NodeType, Topic};
use crate::model::path::IdentifierPath;

//
// ─── CONTEXT ID ────────────────────────────────────────────────────────────────
//

/// Opaque handle to a live context inside a progress store.
///
/// Contexts form a tree; parents are referenced by handle rather than by an
/// owning link, so ownership always flows root-down.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    /// Creates a new `ContextId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextId({})", self.0)
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── NEW CONTEXT ───────────────────────────────────────────────────────────────
//

/// Everything a store needs to create a context mirroring one content node.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContext {
    pub identifier: String,
    pub title: String,
    pub node_type: NodeType,
    pub topic: Option<Topic>,
    pub display_order: i64,
    pub universal_link: Option<Url>,
}

impl NewContext {
    /// Copy the descriptive fields of a content node into a creation record.
    #[must_use]
    pub fn from_node(node: &ContentNode) -> Self {
        Self {
            identifier: node.identifier().to_owned(),
            title: node.title().to_owned(),
            node_type: node.node_type(),
            topic: node.topic(),
            display_order: node.display_order(),
            universal_link: node.universal_link().cloned(),
        }
    }
}

//
// ─── CONTEXT ───────────────────────────────────────────────────────────────────
//

/// Snapshot of one live, store-managed context.
///
/// The store owns the live tree; snapshots are plain values and do not track
/// later mutations. `identifier_path` is root-model-first — the store's own
/// synthetic root contributes no segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    id: ContextId,
    parent: Option<ContextId>,
    identifier: String,
    title: String,
    identifier_path: IdentifierPath,
    node_type: NodeType,
    topic: Option<Topic>,
    display_order: i64,
    universal_link: Option<Url>,
    is_active: bool,
    current_activity: Option<Activity>,
}

impl Context {
    /// Assemble a snapshot from store-side state.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_parts(
        id: ContextId,
        parent: Option<ContextId>,
        identifier: impl Into<String>,
        title: impl Into<String>,
        identifier_path: IdentifierPath,
        node_type: NodeType,
        topic: Option<Topic>,
        display_order: i64,
        universal_link: Option<Url>,
        is_active: bool,
        current_activity: Option<Activity>,
    ) -> Self {
        Self {
            id,
            parent,
            identifier: identifier.into(),
            title: title.into(),
            identifier_path,
            node_type,
            topic,
            display_order,
            universal_link,
            is_active,
            current_activity,
        }
    }

    #[must_use]
    pub fn id(&self) -> ContextId {
        self.id
    }

    #[must_use]
    pub fn parent(&self) -> Option<ContextId> {
        self.parent
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn identifier_path(&self) -> &IdentifierPath {
        &self.identifier_path
    }

    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    #[must_use]
    pub fn topic(&self) -> Option<Topic> {
        self.topic
    }

    #[must_use]
    pub fn display_order(&self) -> i64 {
        self.display_order
    }

    #[must_use]
    pub fn universal_link(&self) -> Option<&Url> {
        self.universal_link.as_ref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn current_activity(&self) -> Option<&Activity> {
        self.current_activity.as_ref()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
