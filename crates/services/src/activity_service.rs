use std::sync::Arc;

use async_trait::async_trait;

use storage::store::{ProgressStore, StoreError};
use study_core::Clock;
use study_core::model::{Activity, ActivityItem, Context, IdentifierPath};

use crate::error::ActivityError;
use crate::reporter::ErrorReporter;

//
// ─── STARTED ACTIVITY ──────────────────────────────────────────────────────────
//

/// What a successful `start_activity` hands back: the resolved context and
/// the freshly started activity on it.
#[derive(Debug, Clone, PartialEq)]
pub struct StartedActivity {
    pub context: Context,
    pub activity: Activity,
}

//
// ─── CAPABILITY ────────────────────────────────────────────────────────────────
//

/// The progress-tracking operations an embedding application works with.
///
/// [`ActivityService`] is the provided implementation; a conforming type
/// holds one and delegates. Operations follow a fire-and-report discipline:
/// apart from the value-bearing `start_activity`, failures funnel exactly
/// once into the [`ErrorReporter`] hook and never panic past the boundary.
/// There are no automatic retries — each operation is attempted once.
#[async_trait]
pub trait ActivityTracking: Send + Sync {
    /// Resolve (creating if needed) the context at `path`, mark it active,
    /// and start a brand-new activity on it.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::ContextNotFound` when the path cannot be
    /// resolved even with provider-driven creation, and
    /// `ActivityError::Store` for backend failures. Being value-bearing,
    /// this operation reports to the caller, not to the hook.
    async fn start_activity(
        &self,
        path: &IdentifierPath,
    ) -> Result<StartedActivity, ActivityError>;

    /// Append a secondary item to the activity at `path`, starting one
    /// first if `start_if_needed` and none is current.
    async fn add_additional_item(
        &self,
        item: ActivityItem,
        path: &IdentifierPath,
        start_if_needed: bool,
    );

    /// Record progress on the activity at `path`. The value is forwarded
    /// untouched; range enforcement is the activity's own business.
    async fn set_progress(&self, progress: f64, path: &IdentifierPath, start_if_needed: bool);

    /// Replace the primary item — typically the headline score — on the
    /// activity at `path`.
    async fn set_primary_item(
        &self,
        item: ActivityItem,
        path: &IdentifierPath,
        start_if_needed: bool,
    );

    /// Stop the current activity at `path`; with `resign_active` the
    /// context is marked inactive as well.
    async fn stop_activity(&self, path: &IdentifierPath, resign_active: bool);

    /// Flush pending store mutations, reporting any failure.
    async fn save(&self);
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Default [`ActivityTracking`] strategy over any [`ProgressStore`].
pub struct ActivityService {
    store: Arc<dyn ProgressStore>,
    reporter: Arc<dyn ErrorReporter>,
    clock: Clock,
}

impl ActivityService {
    #[must_use]
    pub fn new(store: Arc<dyn ProgressStore>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            store,
            reporter,
            clock: Clock::default(),
        }
    }

    /// Replace the clock, mainly to pin time in tests.
    #[must_use]
    pub fn with_clock(self, clock: Clock) -> Self {
        Self { clock, ..self }
    }

    async fn resolve(&self, path: &IdentifierPath) -> Result<Context, ActivityError> {
        match self.store.descendant(path.segments()).await {
            Ok(context) => Ok(context),
            Err(StoreError::NotFound { .. }) => {
                Err(ActivityError::ContextNotFound { path: path.clone() })
            }
            Err(error) => Err(ActivityError::Store(error)),
        }
    }

    /// Shared resolution rule for the item and progress operations: use the
    /// current non-stopped activity, start a fresh one when allowed, fail
    /// otherwise. An existing-but-unstarted activity is only started when
    /// `start_if_needed` permits.
    async fn ensure_activity(
        &self,
        context: &Context,
        path: &IdentifierPath,
        start_if_needed: bool,
    ) -> Result<(), ActivityError> {
        let usable = context
            .current_activity()
            .filter(|activity| !activity.is_stopped());

        match usable {
            Some(activity) => {
                if start_if_needed && !activity.is_started() {
                    self.store
                        .start_activity(context.id(), self.clock.now())
                        .await?;
                }
                Ok(())
            }
            None if start_if_needed => {
                self.store.create_activity(context.id()).await?;
                self.store
                    .start_activity(context.id(), self.clock.now())
                    .await?;
                Ok(())
            }
            None => Err(ActivityError::NoActivity { path: path.clone() }),
        }
    }

    async fn try_start_activity(
        &self,
        path: &IdentifierPath,
    ) -> Result<StartedActivity, ActivityError> {
        let context = self.resolve(path).await?;
        self.store.set_active(context.id(), true).await?;
        self.store.create_activity(context.id()).await?;
        let activity = self
            .store
            .start_activity(context.id(), self.clock.now())
            .await?;
        let context = self.store.context(context.id()).await?;
        Ok(StartedActivity { context, activity })
    }

    async fn try_add_additional_item(
        &self,
        item: ActivityItem,
        path: &IdentifierPath,
        start_if_needed: bool,
    ) -> Result<(), ActivityError> {
        let context = self.resolve(path).await?;
        self.ensure_activity(&context, path, start_if_needed).await?;
        self.store.add_additional_item(context.id(), item).await?;
        self.store.save().await?;
        Ok(())
    }

    async fn try_set_progress(
        &self,
        progress: f64,
        path: &IdentifierPath,
        start_if_needed: bool,
    ) -> Result<(), ActivityError> {
        let context = self.resolve(path).await?;
        self.ensure_activity(&context, path, start_if_needed).await?;
        self.store.set_progress(context.id(), progress).await?;
        self.store.save().await?;
        Ok(())
    }

    async fn try_set_primary_item(
        &self,
        item: ActivityItem,
        path: &IdentifierPath,
        start_if_needed: bool,
    ) -> Result<(), ActivityError> {
        let context = self.resolve(path).await?;
        self.ensure_activity(&context, path, start_if_needed).await?;
        self.store.set_primary_item(context.id(), item).await?;
        self.store.save().await?;
        Ok(())
    }

    async fn try_stop_activity(
        &self,
        path: &IdentifierPath,
        resign_active: bool,
    ) -> Result<(), ActivityError> {
        let context = self.resolve(path).await?;
        if context.current_activity().is_none() {
            return Err(ActivityError::NoActivity { path: path.clone() });
        }
        self.store
            .stop_activity(context.id(), self.clock.now())
            .await?;
        if resign_active {
            self.store.set_active(context.id(), false).await?;
        }
        self.store.save().await?;
        Ok(())
    }

    fn report(&self, error: &ActivityError) {
        self.reporter.report_error(error);
    }
}

#[async_trait]
impl ActivityTracking for ActivityService {
    async fn start_activity(
        &self,
        path: &IdentifierPath,
    ) -> Result<StartedActivity, ActivityError> {
        self.try_start_activity(path).await
    }

    async fn add_additional_item(
        &self,
        item: ActivityItem,
        path: &IdentifierPath,
        start_if_needed: bool,
    ) {
        if let Err(error) = self
            .try_add_additional_item(item, path, start_if_needed)
            .await
        {
            self.report(&error);
        }
    }

    async fn set_progress(&self, progress: f64, path: &IdentifierPath, start_if_needed: bool) {
        if let Err(error) = self.try_set_progress(progress, path, start_if_needed).await {
            self.report(&error);
        }
    }

    async fn set_primary_item(
        &self,
        item: ActivityItem,
        path: &IdentifierPath,
        start_if_needed: bool,
    ) {
        if let Err(error) = self
            .try_set_primary_item(item, path, start_if_needed)
            .await
        {
            self.report(&error);
        }
    }

    async fn stop_activity(&self, path: &IdentifierPath, resign_active: bool) {
        if let Err(error) = self.try_stop_activity(path, resign_active).await {
            self.report(&error);
        }
    }

    async fn save(&self) {
        if let Err(error) = self.store.save().await {
            self.report(&ActivityError::Store(error));
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
