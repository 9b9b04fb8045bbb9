//! The progress-store seam.
//!
//! Any tracking backend — remote SDK, database, or the in-memory reference
//! implementation — plugs in behind [`ProgressStore`]. The store owns the
//! live context tree; helpers mutate it only through this API. Wire
//! protocols and persistence formats live entirely on the other side of the
//! seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use study_core::model::{
    Activity, ActivityItem, Context, ContextId, IdentifierPath, NewContext,
};

/// Errors surfaced by progress-store backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("no context found at path {path}")]
    NotFound { path: IdentifierPath },

    #[error("unknown context id {id}")]
    UnknownContext { id: ContextId },

    #[error("context has no current activity")]
    NoActivity,

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Supplies creation records for contexts the store has not seen yet.
///
/// When a path resolution walks off the live tree, the store asks its
/// provider for the missing child; a `None` answer ends the walk with
/// [`StoreError::NotFound`]. `parent_path` is root-model-first, the same
/// shape [`Context::identifier_path`] returns.
pub trait ContextProvider: Send + Sync {
    fn context_for(&self, identifier: &str, parent_path: &[String]) -> Option<NewContext>;
}

/// Contract any tracking backend must satisfy.
///
/// All operations are asynchronous and run to completion once issued; no
/// cancellation or timeout is modeled here. Mutations accumulate in the
/// backend until [`save`](ProgressStore::save) flushes them as one batch.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Root of the live context tree. Its identifier path is empty; the
    /// synthetic root contributes no path segment to its descendants.
    async fn main_root(&self) -> Result<Context, StoreError>;

    /// Snapshot of a context by handle.
    async fn context(&self, id: ContextId) -> Result<Context, StoreError>;

    /// Resolve the context at an identifier path below the main root,
    /// lazily creating unknown segments through the registered
    /// [`ContextProvider`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when a segment is neither present in
    /// the live tree nor known to the provider.
    async fn descendant(&self, path: &[String]) -> Result<Context, StoreError>;

    /// Snapshots of the contexts whose parent is `parent`.
    async fn children_of(&self, parent: ContextId) -> Result<Vec<Context>, StoreError>;

    /// Create a context from `child` and attach it under `parent`.
    async fn attach_child(
        &self,
        parent: ContextId,
        child: NewContext,
    ) -> Result<Context, StoreError>;

    /// Mark a context active or inactive.
    async fn set_active(&self, id: ContextId, active: bool) -> Result<(), StoreError>;

    /// Replace the context's current activity with a fresh, unstarted one.
    async fn create_activity(&self, id: ContextId) -> Result<Activity, StoreError>;

    /// Start the current activity; returns the started snapshot.
    async fn start_activity(&self, id: ContextId, at: DateTime<Utc>)
    -> Result<Activity, StoreError>;

    /// Stop the current activity.
    async fn stop_activity(&self, id: ContextId, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Record progress on the current activity.
    async fn set_progress(&self, id: ContextId, progress: f64) -> Result<(), StoreError>;

    /// Replace the current activity's primary item.
    async fn set_primary_item(&self, id: ContextId, item: ActivityItem) -> Result<(), StoreError>;

    /// Append a secondary item to the current activity.
    async fn add_additional_item(
        &self,
        id: ContextId,
        item: ActivityItem,
    ) -> Result<(), StoreError>;

    /// Flush every mutation since the last save as one batch.
    async fn save(&self) -> Result<(), StoreError>;
}
