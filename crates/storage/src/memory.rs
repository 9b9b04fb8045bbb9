//! Reference in-memory progress store.
//!
//! Contexts live in an arena keyed by [`ContextId`]; parents are plain
//! handles and children are owned id lists, so the tree carries no owning
//! back-references. The store is the mutation boundary: snapshots handed
//! out are values and never observe later changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use url::Url;

use study_core::model::{
    Activity, ActivityItem, Context, ContextId, IdentifierPath, NewContext, NodeType, Topic,
};

use crate::store::{ContextProvider, ProgressStore, StoreError};

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
struct ContextRecord {
    id: ContextId,
    parent: Option<ContextId>,
    children: Vec<ContextId>,
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

impl ContextRecord {
    fn snapshot(&self) -> Context {
        Context::from_parts(
            self.id,
            self.parent,
            self.identifier.clone(),
            self.title.clone(),
            self.identifier_path.clone(),
            self.node_type,
            self.topic,
            self.display_order,
            self.universal_link.clone(),
            self.is_active,
            self.current_activity.clone(),
        )
    }
}

#[derive(Debug)]
struct Inner {
    arena: HashMap<ContextId, ContextRecord>,
    next_id: u64,
    root: ContextId,
    pending: usize,
    saves: usize,
    fail_next_save: bool,
}

impl Inner {
    fn record(&self, id: ContextId) -> Result<&ContextRecord, StoreError> {
        self.arena
            .get(&id)
            .ok_or(StoreError::UnknownContext { id })
    }

    fn record_mut(&mut self, id: ContextId) -> Result<&mut ContextRecord, StoreError> {
        self.arena
            .get_mut(&id)
            .ok_or(StoreError::UnknownContext { id })
    }

    fn with_activity<T>(
        &mut self,
        id: ContextId,
        apply: impl FnOnce(&mut Activity) -> T,
    ) -> Result<T, StoreError> {
        let record = self.record_mut(id)?;
        let activity = record
            .current_activity
            .as_mut()
            .ok_or(StoreError::NoActivity)?;
        let out = apply(activity);
        self.pending += 1;
        Ok(out)
    }

    fn insert_child(&mut self, parent: ContextId, child: NewContext) -> Result<ContextId, StoreError> {
        let path = self
            .record(parent)?
            .identifier_path
            .child(child.identifier.as_str());
        let id = ContextId::new(self.next_id);
        self.next_id += 1;

        self.arena.insert(
            id,
            ContextRecord {
                id,
                parent: Some(parent),
                children: Vec::new(),
                identifier: child.identifier,
                title: child.title,
                identifier_path: path,
                node_type: child.node_type,
                topic: child.topic,
                display_order: child.display_order,
                universal_link: child.universal_link,
                is_active: false,
                current_activity: None,
            },
        );
        self.record_mut(parent)?.children.push(id);
        self.pending += 1;
        Ok(id)
    }
}

//
// ─── STORE ─────────────────────────────────────────────────────────────────────
//

/// In-memory [`ProgressStore`] for tests, prototyping, and the demo app.
///
/// Contexts are created on first resolution of an unseen path (through the
/// optional [`ContextProvider`]) and never deleted. Mutations count as
/// pending until [`save`](ProgressStore::save) flushes them; a one-shot save
/// failure can be injected so callers' error paths are testable.
pub struct InMemoryProgressStore {
    inner: Mutex<Inner>,
    provider: Option<Arc<dyn ContextProvider>>,
}

impl InMemoryProgressStore {
    /// Create a store whose synthetic root carries the given application
    /// identifier. The root contributes no segment to descendant paths.
    #[must_use]
    pub fn new(app_identifier: impl Into<String>) -> Self {
        let app_identifier = app_identifier.into();
        let root_id = ContextId::new(0);
        let root = ContextRecord {
            id: root_id,
            parent: None,
            children: Vec::new(),
            identifier: app_identifier.clone(),
            title: app_identifier,
            identifier_path: IdentifierPath::root(),
            node_type: NodeType::App,
            topic: None,
            display_order: 0,
            universal_link: None,
            is_active: false,
            current_activity: None,
        };

        let mut arena = HashMap::new();
        arena.insert(root_id, root);

        Self {
            inner: Mutex::new(Inner {
                arena,
                next_id: 1,
                root: root_id,
                pending: 0,
                saves: 0,
                fail_next_save: false,
            }),
            provider: None,
        }
    }

    /// Register the provider consulted for unknown path segments.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn ContextProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Number of mutations accumulated since the last save.
    #[must_use]
    pub fn pending_mutations(&self) -> usize {
        self.inner.lock().map(|inner| inner.pending).unwrap_or(0)
    }

    /// Number of completed saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.saves).unwrap_or(0)
    }

    /// Total number of live contexts, the synthetic root included.
    #[must_use]
    pub fn context_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.arena.len()).unwrap_or(0)
    }

    /// Make the next save fail with a backend error. One-shot.
    pub fn fail_next_save(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_next_save = true;
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn main_root(&self) -> Result<Context, StoreError> {
        let inner = self.lock()?;
        let root = inner.root;
        Ok(inner.record(root)?.snapshot())
    }

    async fn context(&self, id: ContextId) -> Result<Context, StoreError> {
        let inner = self.lock()?;
        Ok(inner.record(id)?.snapshot())
    }

    async fn descendant(&self, path: &[String]) -> Result<Context, StoreError> {
        let mut inner = self.lock()?;
        let mut current = inner.root;

        for segment in path {
            let existing = inner
                .record(current)?
                .children
                .iter()
                .copied()
                .find(|child| {
                    inner
                        .arena
                        .get(child)
                        .is_some_and(|record| record.identifier == *segment)
                });

            current = match existing {
                Some(child) => child,
                None => {
                    let parent_path = inner.record(current)?.identifier_path.clone();
                    let created = self.provider.as_ref().and_then(|provider| {
                        provider.context_for(segment, parent_path.segments())
                    });
                    match created {
                        Some(new_context) => inner.insert_child(current, new_context)?,
                        None => {
                            return Err(StoreError::NotFound {
                                path: IdentifierPath::from(path),
                            });
                        }
                    }
                }
            };
        }

        Ok(inner.record(current)?.snapshot())
    }

    async fn children_of(&self, parent: ContextId) -> Result<Vec<Context>, StoreError> {
        let inner = self.lock()?;
        let children = inner.record(parent)?.children.clone();
        children
            .iter()
            .map(|child| Ok(inner.record(*child)?.snapshot()))
            .collect()
    }

    async fn attach_child(
        &self,
        parent: ContextId,
        child: NewContext,
    ) -> Result<Context, StoreError> {
        let mut inner = self.lock()?;
        let id = inner.insert_child(parent, child)?;
        Ok(inner.record(id)?.snapshot())
    }

    async fn set_active(&self, id: ContextId, active: bool) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.record_mut(id)?.is_active = active;
        inner.pending += 1;
        Ok(())
    }

    async fn create_activity(&self, id: ContextId) -> Result<Activity, StoreError> {
        let mut inner = self.lock()?;
        let record = inner.record_mut(id)?;
        let activity = Activity::new();
        record.current_activity = Some(activity.clone());
        inner.pending += 1;
        Ok(activity)
    }

    async fn start_activity(
        &self,
        id: ContextId,
        at: DateTime<Utc>,
    ) -> Result<Activity, StoreError> {
        let mut inner = self.lock()?;
        inner.with_activity(id, |activity| {
            activity.start(at);
            activity.clone()
        })
    }

    async fn stop_activity(&self, id: ContextId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.with_activity(id, |activity| activity.stop(at))
    }

    async fn set_progress(&self, id: ContextId, progress: f64) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.with_activity(id, |activity| activity.set_progress(progress))
    }

    async fn set_primary_item(&self, id: ContextId, item: ActivityItem) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.with_activity(id, |activity| activity.set_primary_item(item))
    }

    async fn add_additional_item(
        &self,
        id: ContextId,
        item: ActivityItem,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.with_activity(id, |activity| activity.add_additional_item(item))
    }

    async fn save(&self) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.fail_next_save {
            inner.fail_next_save = false;
            return Err(StoreError::Backend("injected save failure".to_owned()));
        }
        inner.pending = 0;
        inner.saves += 1;
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::registry::ContentRegistry;
    use study_core::time::fixed_now;

    const HAMLET: &str = r#"{
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
                    {"identifier": "scene-1", "title": "Scene 1", "displayOrder": 1, "typeInt": 3}
                ]
            }
        ]
    }"#;

    struct RegistryProvider(ContentRegistry);

    impl ContextProvider for RegistryProvider {
        fn context_for(&self, identifier: &str, parent_path: &[String]) -> Option<NewContext> {
            let mut path = parent_path.to_vec();
            path.push(identifier.to_owned());
            self.0.node_at(&path).map(|node| NewContext::from_node(&node))
        }
    }

    fn store_with_hamlet() -> InMemoryProgressStore {
        let mut registry = ContentRegistry::new();
        registry.add_json("hamlet.json", HAMLET).unwrap();
        InMemoryProgressStore::new("com.example.playbook")
            .with_provider(Arc::new(RegistryProvider(registry)))
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| (*s).to_owned()).collect()
    }

    #[tokio::test]
    async fn main_root_has_empty_path() {
        let store = store_with_hamlet();
        let root = store.main_root().await.unwrap();
        assert!(root.identifier_path().is_empty());
        assert_eq!(root.identifier(), "com.example.playbook");
        assert!(root.parent().is_none());
    }

    #[tokio::test]
    async fn descendant_creates_the_missing_chain_through_the_provider() {
        let store = store_with_hamlet();
        assert_eq!(store.context_count(), 1);

        let scene = store
            .descendant(&path(&["hamlet", "act-1", "scene-1"]))
            .await
            .unwrap();
        assert_eq!(scene.identifier_path().to_string(), "hamlet/act-1/scene-1");
        assert_eq!(scene.title(), "Scene 1");
        // Root plus the three created along the walk.
        assert_eq!(store.context_count(), 4);

        // Resolving again reuses the live contexts.
        let again = store
            .descendant(&path(&["hamlet", "act-1", "scene-1"]))
            .await
            .unwrap();
        assert_eq!(again.id(), scene.id());
        assert_eq!(store.context_count(), 4);
    }

    #[tokio::test]
    async fn descendant_fails_for_paths_the_provider_does_not_know() {
        let store = store_with_hamlet();
        let err = store
            .descendant(&path(&["hamlet", "act-7"]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { path } if path.to_string() == "hamlet/act-7"));
    }

    #[tokio::test]
    async fn descendant_without_provider_only_walks_the_live_tree() {
        let store = InMemoryProgressStore::new("com.example.playbook");
        let err = store.descendant(&path(&["hamlet"])).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let root = store.main_root().await.unwrap();
        assert_eq!(store.descendant(&[]).await.unwrap().id(), root.id());
    }

    #[tokio::test]
    async fn children_are_reachable_by_parent_handle() {
        let store = store_with_hamlet();
        let act = store.descendant(&path(&["hamlet", "act-1"])).await.unwrap();
        store
            .descendant(&path(&["hamlet", "act-1", "scene-1"]))
            .await
            .unwrap();

        let children = store.children_of(act.id()).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].identifier(), "scene-1");
        assert_eq!(children[0].parent(), Some(act.id()));
    }

    #[tokio::test]
    async fn activity_ops_require_a_current_activity() {
        let store = store_with_hamlet();
        let scene = store
            .descendant(&path(&["hamlet", "act-1", "scene-1"]))
            .await
            .unwrap();

        let err = store.set_progress(scene.id(), 0.5).await.unwrap_err();
        assert!(matches!(err, StoreError::NoActivity));

        store.create_activity(scene.id()).await.unwrap();
        let activity = store
            .start_activity(scene.id(), fixed_now())
            .await
            .unwrap();
        assert!(activity.is_started());

        store.set_progress(scene.id(), 0.5).await.unwrap();
        let snapshot = store.context(scene.id()).await.unwrap();
        let current = snapshot.current_activity().unwrap();
        assert!((current.progress() - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unknown_handles_are_rejected() {
        let store = store_with_hamlet();
        let bogus = ContextId::new(999);
        assert!(matches!(
            store.context(bogus).await.unwrap_err(),
            StoreError::UnknownContext { id } if id == bogus
        ));
        assert!(matches!(
            store.set_active(bogus, true).await.unwrap_err(),
            StoreError::UnknownContext { .. }
        ));
    }

    #[tokio::test]
    async fn save_flushes_pending_mutations() {
        let store = store_with_hamlet();
        store.descendant(&path(&["hamlet", "act-1"])).await.unwrap();
        assert!(store.pending_mutations() > 0);

        store.save().await.unwrap();
        assert_eq!(store.pending_mutations(), 0);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn injected_save_failure_is_one_shot() {
        let store = store_with_hamlet();
        store.descendant(&path(&["hamlet"])).await.unwrap();

        store.fail_next_save();
        let err = store.save().await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        // Mutations stay pending across the failed save.
        assert!(store.pending_mutations() > 0);

        store.save().await.unwrap();
        assert_eq!(store.pending_mutations(), 0);
    }
}
