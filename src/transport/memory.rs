//! In-process stand-in for the content API, used by tests and demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::TransportError;
use crate::records::record_id;
use crate::resource::Resource;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone)]
struct Failure {
    status: StatusCode,
    message: Option<String>,
}

#[derive(Default)]
pub struct MemoryTransport {
    store: Mutex<HashMap<Resource, Vec<Value>>>,
    failures: Mutex<HashMap<(Resource, Op), Failure>>,
    calls: Mutex<HashMap<(Resource, Op), usize>>,
    next_id: AtomicU64,
}

impl MemoryTransport {
    pub fn new() -> Self { Self::default() }

    /// Replace the stored collection for `resource`.
    pub fn seed(&self, resource: Resource, records: Vec<Value>) {
        self.store.lock().unwrap_or_else(|e| e.into_inner()).insert(resource, records);
    }

    pub fn records(&self, resource: Resource) -> Vec<Value> {
        self.store.lock().unwrap_or_else(|e| e.into_inner()).get(&resource).cloned().unwrap_or_default()
    }

    /// Make the next `op` on `resource` fail with a 500 and an optional body message.
    pub fn fail_next(&self, resource: Resource, op: Op, message: Option<&str>) {
        let failure = Failure { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.map(str::to_string) };
        self.failures.lock().unwrap_or_else(|e| e.into_inner()).insert((resource, op), failure);
    }

    /// How many times `op` was attempted on `resource`.
    pub fn calls(&self, resource: Resource, op: Op) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).get(&(resource, op)).copied().unwrap_or(0)
    }

    fn enter(&self, resource: Resource, op: Op) -> Result<(), TransportError> {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner()).entry((resource, op)).or_default() += 1;
        match self.failures.lock().unwrap_or_else(|e| e.into_inner()).remove(&(resource, op)) {
            Some(f) => Err(TransportError::Status { status: f.status, message: f.message }),
            None => Ok(()),
        }
    }

    fn not_found(resource: Resource) -> TransportError {
        TransportError::Status {
            status: StatusCode::NOT_FOUND,
            message: Some(format!("{} not found", resource.singular())),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn list(&self, resource: Resource) -> Result<Vec<Value>, TransportError> {
        self.enter(resource, Op::List)?;
        Ok(self.records(resource))
    }

    async fn create(&self, resource: Resource, body: &Value) -> Result<Value, TransportError> {
        self.enter(resource, Op::Create)?;
        let id = format!("{:024x}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let now = Utc::now().to_rfc3339();
        let mut record = body.clone();
        if let Some(obj) = record.as_object_mut() {
            obj.insert("_id".into(), Value::String(id));
            obj.insert("createdAt".into(), Value::String(now.clone()));
            obj.insert("updatedAt".into(), Value::String(now));
        }
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.entry(resource).or_default().push(record.clone());
        Ok(record)
    }

    async fn update(&self, resource: Resource, id: &str, body: &Value) -> Result<Value, TransportError> {
        self.enter(resource, Op::Update)?;
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let slot = store
            .get_mut(&resource)
            .and_then(|list| list.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| Self::not_found(resource))?;
        let mut record = body.clone();
        if let Some(obj) = record.as_object_mut() {
            obj.insert("_id".into(), Value::String(id.to_string()));
            if let Some(created) = slot.get("createdAt") {
                obj.insert("createdAt".into(), created.clone());
            }
            obj.insert("updatedAt".into(), Value::String(Utc::now().to_rfc3339()));
        }
        *slot = record.clone();
        Ok(record)
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<(), TransportError> {
        self.enter(resource, Op::Delete)?;
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let list = store.get_mut(&resource).ok_or_else(|| Self::not_found(resource))?;
        let before = list.len();
        list.retain(|r| record_id(r) != Some(id));
        if list.len() == before {
            return Err(Self::not_found(resource));
        }
        Ok(())
    }
}
