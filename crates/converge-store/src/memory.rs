//! In-memory store backend using DashMap.
//!
//! Applications and application sets each live in their own
//! `DashMap<(namespace, name), T>`. The store is cheaply cloneable via
//! `Arc`, so a test can hand one clone to the fixture and keep another to
//! play the part of the controller that converges state in the background.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::client::{ApplicationClient, ApplicationSetClient};
use crate::error::StoreError;
use crate::model::{Application, ApplicationSet, ObjectMeta};

type Key = (String, String);

struct Inner {
    applications: DashMap<Key, Application>,
    application_sets: DashMap<Key, ApplicationSet>,
    unavailable: AtomicBool,
    reads: AtomicU64,
}

/// Shared in-memory store. All clones share the same data.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                applications: DashMap::new(),
                application_sets: DashMap::new(),
                unavailable: AtomicBool::new(false),
                reads: AtomicU64::new(0),
            }),
        }
    }

    /// An application set client bound to `namespace`.
    pub fn application_sets(&self, namespace: &str) -> NamespacedApplicationSets {
        NamespacedApplicationSets {
            store: self.clone(),
            namespace: namespace.to_string(),
        }
    }

    /// Simulate an outage: while set, every operation fails with
    /// [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of read operations served so far.
    pub fn read_count(&self) -> u64 {
        self.inner.reads.load(Ordering::SeqCst)
    }

    fn guard(&self, operation: &str) -> Result<(), StoreError> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                operation: operation.to_string(),
                reason: "store marked unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn record_read(&self) {
        self.inner.reads.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill in store-assigned metadata. Replacing an existing object keeps its
/// uid and creation time and bumps the generation.
fn stamp(meta: &mut ObjectMeta, previous: Option<&ObjectMeta>) -> Result<(), StoreError> {
    if meta.name.is_empty() {
        return Err(StoreError::InvalidObject("metadata.name is empty".into()));
    }
    match previous {
        Some(prev) => {
            meta.uid = prev.uid;
            meta.created_at = prev.created_at;
            meta.generation = prev.generation + 1;
        }
        None => {
            meta.uid = Some(Uuid::new_v4());
            meta.created_at = Some(Utc::now());
            meta.generation = 1;
        }
    }
    Ok(())
}

trait Stored: Clone {
    fn meta(&self) -> &ObjectMeta;
    fn meta_mut(&mut self) -> &mut ObjectMeta;
}

impl Stored for Application {
    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

impl Stored for ApplicationSet {
    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

/// Create or replace `object`. The shard lock is held from reading the
/// previous version until the new one is written, so concurrent applies to
/// one key are serialised and each sees its predecessor.
fn upsert<T: Stored>(map: &DashMap<Key, T>, mut object: T) -> Result<T, StoreError> {
    let key = (object.meta().namespace.clone(), object.meta().name.clone());
    match map.entry(key) {
        Entry::Occupied(mut entry) => {
            stamp(object.meta_mut(), Some(entry.get().meta()))?;
            entry.insert(object.clone());
        }
        Entry::Vacant(entry) => {
            stamp(object.meta_mut(), None)?;
            entry.insert(object.clone());
        }
    }
    Ok(object)
}

impl ApplicationClient for MemoryStore {
    fn list(&self, namespace: &str) -> Result<Vec<Application>, StoreError> {
        self.guard("list applications")?;
        self.record_read();
        let mut apps: Vec<Application> = self
            .inner
            .applications
            .iter()
            .filter(|entry| entry.key().0 == namespace)
            .map(|entry| entry.value().clone())
            .collect();
        apps.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
        Ok(apps)
    }

    fn apply(&self, app: Application) -> Result<Application, StoreError> {
        self.guard("apply application")?;
        let app = upsert(&self.inner.applications, app)?;
        tracing::debug!(
            namespace = %app.metadata.namespace,
            name = %app.metadata.name,
            generation = app.metadata.generation,
            "applied application"
        );
        Ok(app)
    }

    fn delete(&self, namespace: &str, name: &str) -> Result<bool, StoreError> {
        self.guard("delete application")?;
        let removed = self
            .inner
            .applications
            .remove(&(namespace.to_string(), name.to_string()))
            .is_some();
        tracing::debug!(namespace, name, removed, "deleted application");
        Ok(removed)
    }
}

/// Application set client for one namespace of a [`MemoryStore`].
#[derive(Clone)]
pub struct NamespacedApplicationSets {
    store: MemoryStore,
    namespace: String,
}

impl NamespacedApplicationSets {
    fn key(&self, name: &str) -> Key {
        (self.namespace.clone(), name.to_string())
    }
}

impl ApplicationSetClient for NamespacedApplicationSets {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get(&self, name: &str) -> Result<Option<ApplicationSet>, StoreError> {
        self.store.guard("get application set")?;
        self.store.record_read();
        Ok(self
            .store
            .inner
            .application_sets
            .get(&self.key(name))
            .map(|e| e.value().clone()))
    }

    fn apply(&self, mut set: ApplicationSet) -> Result<ApplicationSet, StoreError> {
        self.store.guard("apply application set")?;
        set.metadata.namespace = self.namespace.clone();
        let set = upsert(&self.store.inner.application_sets, set)?;
        tracing::debug!(
            namespace = %set.metadata.namespace,
            name = %set.metadata.name,
            generation = set.metadata.generation,
            "applied application set"
        );
        Ok(set)
    }

    fn delete(&self, name: &str) -> Result<bool, StoreError> {
        self.store.guard("delete application set")?;
        let removed = self
            .store
            .inner
            .application_sets
            .remove(&self.key(name))
            .is_some();
        tracing::debug!(namespace = %self.namespace, name, removed, "deleted application set");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_is_scoped_and_sorted() {
        let store = MemoryStore::new();
        store.apply(Application::new("ns-a", "zeta")).unwrap();
        store.apply(Application::new("ns-a", "alpha")).unwrap();
        store.apply(Application::new("ns-b", "other")).unwrap();

        let names: Vec<String> = store
            .list("ns-a")
            .unwrap()
            .into_iter()
            .map(|a| a.metadata.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert!(store.list("ns-c").unwrap().is_empty());
    }

    #[test]
    fn apply_assigns_then_preserves_identity() {
        let store = MemoryStore::new();
        let first = store.apply(Application::new("ns", "app")).unwrap();
        assert!(first.metadata.uid.is_some());
        assert!(first.metadata.created_at.is_some());
        assert_eq!(first.metadata.generation, 1);

        let second = store
            .apply(Application::new("ns", "app").with_status(json!({"health": "Healthy"})))
            .unwrap();
        assert_eq!(second.metadata.uid, first.metadata.uid);
        assert_eq!(second.metadata.created_at, first.metadata.created_at);
        assert_eq!(second.metadata.generation, 2);
        assert_eq!(store.list("ns").unwrap()[0].status["health"], "Healthy");
    }

    #[test]
    fn concurrent_applies_to_one_key_get_distinct_generations() {
        const WRITERS: u64 = 8;
        for round in 0..50 {
            let store = MemoryStore::new();
            let sets = store.application_sets("ns");
            let barrier = std::sync::Barrier::new(WRITERS as usize * 2);
            let name = format!("contended-{round}");

            let (mut apps, mut generators) = std::thread::scope(|s| {
                let app_handles: Vec<_> = (0..WRITERS)
                    .map(|_| {
                        s.spawn(|| {
                            barrier.wait();
                            store.apply(Application::new("ns", name.as_str())).unwrap()
                        })
                    })
                    .collect();
                let set_handles: Vec<_> = (0..WRITERS)
                    .map(|_| {
                        s.spawn(|| {
                            barrier.wait();
                            sets.apply(ApplicationSet::new("ns", name.as_str())).unwrap()
                        })
                    })
                    .collect();
                (
                    app_handles
                        .into_iter()
                        .map(|h| h.join().unwrap().metadata)
                        .collect::<Vec<_>>(),
                    set_handles
                        .into_iter()
                        .map(|h| h.join().unwrap().metadata)
                        .collect::<Vec<_>>(),
                )
            });

            for metas in [&mut apps, &mut generators] {
                metas.sort_by_key(|m| m.generation);
                let generations: Vec<u64> = metas.iter().map(|m| m.generation).collect();
                assert_eq!(generations, (1..=WRITERS).collect::<Vec<_>>(), "round {round}");
                assert!(
                    metas.iter().all(|m| m.uid == metas[0].uid),
                    "round {round}: every apply must keep the first uid"
                );
            }
            assert_eq!(store.list("ns").unwrap()[0].metadata.generation, WRITERS);
            assert_eq!(
                sets.get(&name).unwrap().unwrap().metadata.generation,
                WRITERS
            );
        }
    }

    #[test]
    fn apply_rejects_unnamed_objects() {
        let store = MemoryStore::new();
        let err = store.apply(Application::new("ns", "")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidObject(_)));
    }

    #[test]
    fn delete_reports_existence() {
        let store = MemoryStore::new();
        store.apply(Application::new("ns", "app")).unwrap();
        assert!(store.delete("ns", "app").unwrap());
        assert!(!store.delete("ns", "app").unwrap());
    }

    #[test]
    fn application_sets_are_namespace_bound() {
        let store = MemoryStore::new();
        let main = store.application_sets("main");
        let external = store.application_sets("external");

        let stored = main
            .apply(ApplicationSet::new("ignored", "generator"))
            .unwrap();
        assert_eq!(stored.metadata.namespace, "main");

        assert!(main.get("generator").unwrap().is_some());
        assert!(external.get("generator").unwrap().is_none());
        assert!(main.delete("generator").unwrap());
        assert!(main.get("generator").unwrap().is_none());
    }

    #[test]
    fn outage_fails_every_operation() {
        let store = MemoryStore::new();
        let sets = store.application_sets("ns");
        store.set_unavailable(true);

        assert!(matches!(
            store.list("ns"),
            Err(StoreError::Unavailable { .. })
        ));
        assert!(matches!(sets.get("x"), Err(StoreError::Unavailable { .. })));
        assert!(store.apply(Application::new("ns", "a")).is_err());

        store.set_unavailable(false);
        assert!(store.list("ns").unwrap().is_empty());
    }

    #[test]
    fn reads_are_counted() {
        let store = MemoryStore::new();
        let sets = store.application_sets("ns");
        store.list("ns").unwrap();
        sets.get("x").unwrap();
        assert_eq!(store.read_count(), 2);
    }
}
