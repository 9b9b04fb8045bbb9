use std::sync::Arc;

use thiserror::Error;

use storage::memory::InMemoryProgressStore;
use storage::store::ProgressStore;
use study_core::Clock;
use study_core::registry::{ContentRegistry, RegistryError};

use crate::activity_service::ActivityService;
use crate::declaration_service::DeclarationService;
use crate::provider::RegistryContextProvider;
use crate::reconciler::Reconciler;
use crate::reporter::ErrorReporter;

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Assembles the tracking services around one registry and one store.
///
/// This is the composition root: the registry is loaded here, once, and
/// every component receives its shared handle — nothing reaches for a
/// global. Sources are `(file name, JSON)` pairs; a duplicate file or root
/// identifier is skipped, first registration wins.
#[derive(Clone)]
pub struct AppServices {
    registry: Arc<ContentRegistry>,
    store: Arc<InMemoryProgressStore>,
    activity: Arc<ActivityService>,
    reconciler: Arc<Reconciler>,
    declaration: Arc<DeclarationService>,
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices").finish_non_exhaustive()
    }
}

impl AppServices {
    /// Build services backed by the in-memory reference store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Registry` when a content source fails to
    /// decode or validate.
    pub fn new_in_memory(
        app_identifier: &str,
        sources: &[(&str, &str)],
        reporter: Arc<dyn ErrorReporter>,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let mut registry = ContentRegistry::new();
        for (file, json) in sources {
            registry.add_json(file, json)?;
        }
        let registry = Arc::new(registry);

        let store = Arc::new(
            InMemoryProgressStore::new(app_identifier).with_provider(Arc::new(
                RegistryContextProvider::new(Arc::clone(&registry)),
            )),
        );
        let store_handle: Arc<dyn ProgressStore> = store.clone();

        let activity = Arc::new(
            ActivityService::new(Arc::clone(&store_handle), reporter).with_clock(clock),
        );
        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&registry),
            Arc::clone(&store_handle),
        ));
        let declaration = Arc::new(DeclarationService::new(
            Arc::clone(&registry),
            store_handle,
        ));

        Ok(Self {
            registry,
            store,
            activity,
            reconciler,
            declaration,
        })
    }

    #[must_use]
    pub fn registry(&self) -> Arc<ContentRegistry> {
        Arc::clone(&self.registry)
    }

    #[must_use]
    pub fn store(&self) -> Arc<dyn ProgressStore> {
        self.store.clone()
    }

    #[must_use]
    pub fn activity(&self) -> Arc<ActivityService> {
        Arc::clone(&self.activity)
    }

    #[must_use]
    pub fn reconciler(&self) -> Arc<Reconciler> {
        Arc::clone(&self.reconciler)
    }

    #[must_use]
    pub fn declaration(&self) -> Arc<DeclarationService> {
        Arc::clone(&self.declaration)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
