//! Cached copies of remote collections and the mutations that keep them in
//! step with the server.

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{SyncError, TransportError};
use crate::records::{record_id, ContentRecord};
use crate::resource::Resource;
use crate::transport::Transport;

/// Interactive confirmation asked before destructive calls.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool { self(prompt) }
}

/// Confirmation that always answers yes, for non-interactive callers.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool { true }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

impl LoadState {
    /// Loaded or failed: either way the page may stop waiting.
    pub fn is_settled(self) -> bool { matches!(self, LoadState::Loaded | LoadState::Failed) }
}

/// The cached list for one resource.
pub struct Collection<T> {
    resource: Resource,
    transport: T,
    items: Vec<Value>,
    state: LoadState,
    error: Option<String>,
}

impl<T: Transport> Collection<T> {
    pub fn new(resource: Resource, transport: T) -> Self {
        Self { resource, transport, items: Vec::new(), state: LoadState::Idle, error: None }
    }

    pub fn resource(&self) -> Resource { self.resource }

    pub fn items(&self) -> &[Value] { &self.items }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn state(&self) -> LoadState { self.state }

    /// Banner text from the last failed operation.
    pub fn error(&self) -> Option<&str> { self.error.as_deref() }

    pub fn clear_error(&mut self) { self.error = None; }

    pub fn find(&self, id: &str) -> Option<&Value> {
        self.items.iter().find(|r| record_id(r) == Some(id))
    }

    /// Typed records; entries that do not fit the resource shape are skipped.
    pub fn records(&self) -> Vec<ContentRecord> {
        self.items
            .iter()
            .filter_map(|v| match ContentRecord::from_value(self.resource, v.clone()) {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!(resource = %self.resource, id = ?record_id(v), "skipping malformed record: {e}");
                    None
                }
            })
            .collect()
    }

    /// Fetch the whole collection and replace the cache.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        self.state = LoadState::Loading;
        match self.transport.list(self.resource).await {
            Ok(items) => {
                info!(resource = %self.resource, count = items.len(), "loaded");
                self.items = items;
                self.state = LoadState::Loaded;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.state = LoadState::Failed;
                Err(self.fail(e, format!("Failed to fetch {}", self.resource.plural())))
            }
        }
    }

    /// Create a record; the server's copy is appended to the cache.
    pub async fn create(&mut self, doc: &Value) -> Result<Value, SyncError> {
        match self.transport.create(self.resource, doc).await {
            Ok(record) => {
                info!(resource = %self.resource, id = ?record_id(&record), "created");
                self.items.push(record.clone());
                self.error = None;
                Ok(record)
            }
            Err(e) => Err(self.fail(e, format!("Error saving {}", self.resource.singular()))),
        }
    }

    /// Update record `id`; the cached entry with that id is replaced by the
    /// server's copy.
    pub async fn update(&mut self, id: &str, doc: &Value) -> Result<Value, SyncError> {
        match self.transport.update(self.resource, id, doc).await {
            Ok(record) => {
                info!(resource = %self.resource, id, "updated");
                for slot in self.items.iter_mut().filter(|r| record_id(r) == Some(id)) {
                    *slot = record.clone();
                }
                self.error = None;
                Ok(record)
            }
            Err(e) => Err(self.fail(e, format!("Error saving {}", self.resource.singular()))),
        }
    }

    /// Delete record `id` after confirmation. Returns `false` if declined.
    pub async fn remove(&mut self, id: &str, confirm: &mut impl Confirm) -> Result<bool, SyncError> {
        if !confirm.confirm(&format!("Delete this {}?", self.resource.singular())) {
            return Ok(false);
        }
        match self.transport.delete(self.resource, id).await {
            Ok(()) => {
                info!(resource = %self.resource, id, "deleted");
                self.items.retain(|r| record_id(r) != Some(id));
                self.error = None;
                Ok(true)
            }
            Err(e) => Err(self.fail(e, format!("Failed to delete {}", self.resource.singular()))),
        }
    }

    fn fail(&mut self, source: TransportError, generic: String) -> SyncError {
        let err = SyncError::surface(source, generic);
        warn!(resource = %self.resource, "{}: {}", err.banner, err.source);
        self.error = Some(err.banner.clone());
        err
    }
}

/// A read-only list other forms pick from (the category dropdown).
///
/// Fetched once per activation; later loads are no-ops until `reset`.
pub struct ReferenceList<T> {
    inner: Collection<T>,
}

impl<T: Transport> ReferenceList<T> {
    pub fn new(resource: Resource, transport: T) -> Self { Self { inner: Collection::new(resource, transport) } }

    /// Fetch the list unless it already settled since the last `reset`.
    ///
    /// Once settled this is a no-op returning `Ok(())`, even after a failed
    /// fetch: the earlier failure stays visible through `state()` and
    /// `error()`, and no request is sent.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        if self.inner.state().is_settled() {
            return Ok(());
        }
        self.inner.load().await
    }

    pub fn reset(&mut self) {
        self.inner.state = LoadState::Idle;
        self.inner.error = None;
    }

    pub fn loaded(&self) -> bool { self.inner.state() == LoadState::Loaded }

    pub fn state(&self) -> LoadState { self.inner.state() }

    pub fn error(&self) -> Option<&str> { self.inner.error() }

    pub fn items(&self) -> &[Value] { self.inner.items() }

    /// `(id, name)` pairs for a dropdown, in server order.
    pub fn options(&self) -> Vec<(String, String)> {
        self.inner
            .items()
            .iter()
            .filter_map(|r| {
                let id = record_id(r)?;
                let name = r.get("name").and_then(Value::as_str).unwrap_or(id);
                Some((id.to_string(), name.to_string()))
            })
            .collect()
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.inner.find(id).and_then(|r| r.get("name")).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::{MemoryTransport, Op};
    use serde_json::json;
    use std::sync::Arc;

    fn two_articles() -> (Arc<MemoryTransport>, Collection<Arc<MemoryTransport>>) {
        let t = Arc::new(MemoryTransport::new());
        t.seed(Resource::Articles, vec![json!({ "_id": "1", "title": "A" }), json!({ "_id": "2", "title": "B" })]);
        let c = Collection::new(Resource::Articles, t.clone());
        (t, c)
    }

    #[tokio::test]
    async fn load_replaces_cache() {
        let (t, mut c) = two_articles();
        c.load().await.unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.state(), LoadState::Loaded);

        t.seed(Resource::Articles, vec![json!({ "_id": "3", "title": "C" })]);
        c.load().await.unwrap();
        assert_eq!(c.items(), &[json!({ "_id": "3", "title": "C" })]);
    }

    #[tokio::test]
    async fn failed_load_keeps_cache_and_sets_banner() {
        let (t, mut c) = two_articles();
        c.load().await.unwrap();
        t.fail_next(Resource::Articles, Op::List, None);
        let err = c.load().await.unwrap_err();
        assert_eq!(err.banner, "Failed to fetch articles");
        assert_eq!(c.error(), Some("Failed to fetch articles"));
        assert_eq!(c.state(), LoadState::Failed);
        assert_eq!(c.len(), 2);
    }

    #[tokio::test]
    async fn remove_filters_on_success_only() {
        let (t, mut c) = two_articles();
        c.load().await.unwrap();

        t.fail_next(Resource::Articles, Op::Delete, None);
        assert!(c.remove("2", &mut AssumeYes).await.is_err());
        assert_eq!(c.len(), 2);
        assert_eq!(c.error(), Some("Failed to delete article"));

        assert!(c.remove("2", &mut AssumeYes).await.unwrap());
        assert_eq!(c.items(), &[json!({ "_id": "1", "title": "A" })]);
        assert_eq!(c.error(), None);
    }

    #[tokio::test]
    async fn declined_remove_sends_nothing() {
        let (t, mut c) = two_articles();
        c.load().await.unwrap();
        let mut prompts = Vec::new();
        let mut decline = |p: &str| {
            prompts.push(p.to_string());
            false
        };
        assert!(!c.remove("1", &mut decline).await.unwrap());
        assert_eq!(prompts, vec!["Delete this article?"]);
        assert_eq!(t.calls(Resource::Articles, Op::Delete), 0);
        assert_eq!(c.len(), 2);
    }

    #[tokio::test]
    async fn update_replaces_matching_entry() {
        let (_t, mut c) = two_articles();
        c.load().await.unwrap();
        let rec = c.update("1", &json!({ "title": "A2" })).await.unwrap();
        assert_eq!(rec["_id"], "1");
        assert_eq!(c.find("1").unwrap()["title"], "A2");
        assert_eq!(c.items()[1]["title"], "B");
    }

    #[tokio::test]
    async fn server_message_wins_over_generic() {
        let (t, mut c) = two_articles();
        t.fail_next(Resource::Articles, Op::Create, Some("Title already exists"));
        let err = c.create(&json!({ "title": "A" })).await.unwrap_err();
        assert_eq!(err.banner, "Title already exists");
        assert!(c.is_empty());
    }

    #[tokio::test]
    async fn reference_list_loads_once() {
        let t = Arc::new(MemoryTransport::new());
        t.seed(Resource::Categories, vec![json!({ "_id": "c1", "name": "Cardiology" }), json!({ "_id": "c2" })]);
        let mut cats = ReferenceList::new(Resource::Categories, t.clone());
        cats.load().await.unwrap();
        cats.load().await.unwrap();
        assert_eq!(t.calls(Resource::Categories, Op::List), 1);
        assert!(cats.loaded());
        assert_eq!(cats.options(), vec![("c1".into(), "Cardiology".into()), ("c2".into(), "c2".into())]);
        assert_eq!(cats.name_of("c1"), Some("Cardiology"));

        cats.reset();
        cats.load().await.unwrap();
        assert_eq!(t.calls(Resource::Categories, Op::List), 2);
    }

    #[tokio::test]
    async fn reference_list_failure_stays_visible_until_reset() {
        let t = Arc::new(MemoryTransport::new());
        t.seed(Resource::Categories, vec![json!({ "_id": "c1", "name": "Cardiology" })]);
        t.fail_next(Resource::Categories, Op::List, None);
        let mut cats = ReferenceList::new(Resource::Categories, t.clone());
        assert!(cats.load().await.is_err());

        cats.load().await.unwrap();
        assert_eq!(t.calls(Resource::Categories, Op::List), 1);
        assert_eq!(cats.state(), LoadState::Failed);
        assert!(!cats.loaded());
        assert_eq!(cats.error(), Some("Failed to fetch categories"));
        assert!(cats.options().is_empty());

        cats.reset();
        cats.load().await.unwrap();
        assert!(cats.loaded());
        assert_eq!(cats.options().len(), 1);
    }
}
