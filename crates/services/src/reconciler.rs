use std::sync::Arc;

use storage::store::ProgressStore;
use study_core::model::{Context, NewContext};
use study_core::registry::ContentRegistry;

use crate::error::ReconcileError;

/// Brings a store's live children of one context in line with the content
/// model, creating whatever the store is missing.
///
/// Reconciliation is scoped to a single context's children: siblings
/// elsewhere in the tree are untouched, existing children are never
/// duplicated, and nothing is ever removed. Repeated runs against an
/// unchanged model are no-ops.
pub struct Reconciler {
    registry: Arc<ContentRegistry>,
    store: Arc<dyn ProgressStore>,
}

impl Reconciler {
    #[must_use]
    pub fn new(registry: Arc<ContentRegistry>, store: Arc<dyn ProgressStore>) -> Self {
        Self { registry, store }
    }

    /// Ensure the store has a child context for every content child of
    /// `context`'s model node, then save.
    ///
    /// # Errors
    ///
    /// Returns `ReconcileError::ContextModelNotFound` when no content node
    /// matches the context's identifier path, and `ReconcileError::Store`
    /// when a store query or the final save fails. A failed save does not
    /// roll back children already attached in memory; the store's own save
    /// semantics are the recovery point.
    pub async fn reconcile_children(&self, context: &Context) -> Result<(), ReconcileError> {
        let path = context.identifier_path();

        let Some(model) = self.registry.node_at(path.segments()) else {
            tracing::error!(%path, "no content model matches the context path");
            return Err(ReconcileError::ContextModelNotFound { path: path.clone() });
        };

        if model.children().is_empty() {
            tracing::info!(%path, "content node has no children to mirror");
            return Ok(());
        }

        let existing = self.store.children_of(context.id()).await?;
        let mut created = 0usize;
        for child in model.children() {
            if existing
                .iter()
                .any(|present| present.identifier() == child.identifier())
            {
                continue;
            }
            self.store
                .attach_child(context.id(), NewContext::from_node(child))
                .await?;
            created += 1;
        }

        match self.store.save().await {
            Ok(()) => {
                tracing::info!(%path, created, "saved mirrored child contexts");
                Ok(())
            }
            Err(error) => {
                tracing::error!(%path, %error, "save failed after attaching children");
                Err(error.into())
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
