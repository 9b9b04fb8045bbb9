#![forbid(unsafe_code)]

pub mod index;
pub mod model;
pub mod registry;
pub mod time;

pub use time::Clock;

pub use model::{
    Activity, ActivityItem, ActivityItemError, BinaryKind, ContentNode, Context, ContextId,
    IdentifierPath, NewContext, NodeDraft, NodeError, NodeType, Topic,
};
pub use registry::{ContentRegistry, RegistryError};
