#![allow(dead_code)]

use async_trait::async_trait;
use payment_recorder::domain::path::StoragePath;
use payment_recorder::domain::ports::{IdentityProvider, Notifier, Storage};
use payment_recorder::error::{RecorderError, Result};
use payment_recorder::infrastructure::in_memory::InMemoryStore;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Ordered log of every collaborator call, shared between fakes.
#[derive(Clone, Default)]
pub struct Journal {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn push(&self, line: String) {
        self.lines.lock().unwrap().push(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.lines()
            .iter()
            .filter(|l| l.starts_with(prefix))
            .count()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.lines().iter().position(|l| l.starts_with(prefix))
    }
}

/// In-memory storage that journals calls and can be switched offline.
#[derive(Clone, Default)]
pub struct JournaledStorage {
    pub inner: InMemoryStore,
    pub journal: Journal,
    pub fail_writes: Arc<AtomicBool>,
    pub fail_clears: Arc<AtomicBool>,
}

impl JournaledStorage {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub fn go_offline(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
        self.fail_clears.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for JournaledStorage {
    async fn write(&self, path: &StoragePath, value: Value) -> Result<()> {
        self.journal.push(format!("write {path}"));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RecorderError::StorageWrite("storage unavailable".to_string()));
        }
        self.inner.write(path, value).await
    }

    async fn clear(&self, path: &StoragePath) -> Result<()> {
        self.journal.push(format!("clear {path}"));
        if self.fail_clears.load(Ordering::SeqCst) {
            return Err(RecorderError::StorageWrite("storage unavailable".to_string()));
        }
        self.inner.clear(path).await
    }

    async fn read(&self, path: &StoragePath) -> Result<Option<Value>> {
        self.inner.read(path).await
    }

    async fn scan(&self, prefix: &StoragePath) -> Result<Vec<(String, Value)>> {
        self.inner.scan(prefix).await
    }
}

/// Notifier that journals every publish and keeps the payloads.
#[derive(Clone, Default)]
pub struct JournaledNotifier {
    pub journal: Journal,
    pub published: Arc<Mutex<Vec<(String, Map<String, Value>)>>>,
    pub fail: Arc<AtomicBool>,
}

impl JournaledNotifier {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<(String, Map<String, Value>)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for JournaledNotifier {
    async fn publish(&self, event_name: &str, payload: Map<String, Value>) -> Result<()> {
        self.journal.push(format!("publish {event_name}"));
        if self.fail.load(Ordering::SeqCst) {
            return Err(RecorderError::Notification("bus down".to_string()));
        }
        self.published
            .lock()
            .unwrap()
            .push((event_name.to_string(), payload));
        Ok(())
    }
}

/// Identity collaborator that always errors.
pub struct BrokenIdentity;

#[async_trait]
impl IdentityProvider for BrokenIdentity {
    async fn current_user_id(&self) -> Result<Option<String>> {
        Err(RecorderError::InternalError(Box::new(std::io::Error::other(
            "auth backend unreachable",
        ))))
    }
}

pub fn path(raw: &str) -> StoragePath {
    let mut segments = raw.split('/');
    let mut path = StoragePath::root(segments.next().unwrap()).unwrap();
    for segment in segments {
        path = path.child(segment).unwrap();
    }
    path
}
