use std::sync::Arc;
use std::time::Instant;

use storage::store::ProgressStore;
use study_core::registry::ContentRegistry;

/// Declares the full content tree to a store up front.
///
/// Resolving every leaf path forces creation of each branch bottom and all
/// ancestors along the way, so the store knows the whole hierarchy before
/// any of it is visited. Cost scales with tree size and depth — run this
/// off the interactive thread for large content sets.
pub struct DeclarationService {
    registry: Arc<ContentRegistry>,
    store: Arc<dyn ProgressStore>,
}

impl DeclarationService {
    #[must_use]
    pub fn new(registry: Arc<ContentRegistry>, store: Arc<dyn ProgressStore>) -> Self {
        Self { registry, store }
    }

    /// Touch every leaf path of every registered root.
    ///
    /// Each leaf is attempted once; failures are logged and skipped rather
    /// than aborting the sweep. Returns the number of leaves declared.
    pub async fn declare_all(&self) -> usize {
        let started = Instant::now();
        let mut declared = 0usize;

        for path in self.registry.leaf_paths() {
            match self.store.descendant(path.segments()).await {
                Ok(_) => declared += 1,
                Err(error) => {
                    tracing::warn!(%path, %error, "failed to declare context");
                }
            }
        }

        tracing::debug!(
            declared,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "context declaration finished"
        );
        declared
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
