pub mod activity;
pub mod context;
pub mod node;
pub mod path;

pub use activity::{Activity, ActivityItem, ActivityItemError, BinaryKind};
pub use context::{Context, ContextId, NewContext};
pub use node::{ContentNode, NodeDraft, NodeError, NodeType, Topic};
pub use path::IdentifierPath;
