//! In-memory collaborators for router tests

#![allow(dead_code)]

use async_trait::async_trait;
use firewall_core::{Alert, AuditRecord, ModerationLabel, RouterConfig};
use firewall_router::ModerationRouter;
use firewall_services::{
    AlertNotifier, AuditStore, ContentClassifier, ServiceError, ServiceResult,
};
use firewall_storage::{ObjectStorage, StorageBackend, StorageError, StorageResult};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const INTAKE: &str = "image-firewall-upload";
pub const ALLOWED: &str = "image-firewall-allowed";
pub const QUARANTINE: &str = "image-firewall-quarantine";

/// Storage operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageOp {
    ContentLength,
    Download,
    Copy,
    Delete,
}

/// Object storage keyed by (bucket, key)
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    failing: Mutex<HashSet<StorageOp>>,
    /// Report NotFound from delete, as when another invocation removed the source first
    delete_not_found: Mutex<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, bucket: &str, key: &str, data: Vec<u8>) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), data);
    }

    pub fn has(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn fail(&self, op: StorageOp) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn delete_reports_not_found(&self) {
        *self.delete_not_found.lock().unwrap() = true;
    }

    fn check(&self, op: StorageOp) -> StorageResult<()> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(StorageError::BackendError(format!("injected {:?} failure", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn content_length(&self, bucket: &str, key: &str) -> StorageResult<u64> {
        self.check(StorageOp::ContentLength)?;
        self.get(bucket, key)
            .map(|data| data.len() as u64)
            .ok_or_else(|| StorageError::not_found(bucket, key))
    }

    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        self.check(StorageOp::Download)?;
        self.get(bucket, key)
            .ok_or_else(|| StorageError::not_found(bucket, key))
    }

    async fn copy(&self, from_bucket: &str, to_bucket: &str, key: &str) -> StorageResult<()> {
        self.check(StorageOp::Copy)?;
        let data = self
            .get(from_bucket, key)
            .ok_or_else(|| StorageError::not_found(from_bucket, key))?;
        self.put(to_bucket, key, data);
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.check(StorageOp::Delete)?;
        if *self.delete_not_found.lock().unwrap() {
            self.objects
                .lock()
                .unwrap()
                .remove(&(bucket.to_string(), key.to_string()));
            return Err(StorageError::not_found(bucket, key));
        }
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        Ok(self.has(bucket, key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Classifier returning a scripted label list
#[derive(Default)]
pub struct FakeClassifier {
    labels: Mutex<Vec<ModerationLabel>>,
    failure: Mutex<Option<String>>,
    calls: AtomicUsize,
    last_min_confidence: Mutex<Option<f32>>,
}

impl FakeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(labels: Vec<ModerationLabel>) -> Self {
        let classifier = Self::default();
        *classifier.labels.lock().unwrap() = labels;
        classifier
    }

    pub fn failing(message: &str) -> Self {
        let classifier = Self::default();
        *classifier.failure.lock().unwrap() = Some(message.to_string());
        classifier
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_min_confidence(&self) -> Option<f32> {
        *self.last_min_confidence.lock().unwrap()
    }
}

#[async_trait]
impl ContentClassifier for FakeClassifier {
    async fn detect_moderation_labels(
        &self,
        _image: &[u8],
        min_confidence: f32,
    ) -> ServiceResult<Vec<ModerationLabel>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_min_confidence.lock().unwrap() = Some(min_confidence);
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(ServiceError::Classification(message));
        }
        Ok(self.labels.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemoryAuditStore {
    records: Mutex<Vec<AuditRecord>>,
    failing: Mutex<bool>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let store = Self::default();
        *store.failing.lock().unwrap() = true;
        store
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, record: &AuditRecord) -> ServiceResult<()> {
        if *self.failing.lock().unwrap() {
            return Err(ServiceError::Audit("table unavailable".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<Alert>>,
    failing: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let notifier = Self::default();
        *notifier.failing.lock().unwrap() = true;
        notifier
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertNotifier for RecordingNotifier {
    async fn publish(&self, alert: &Alert) -> ServiceResult<()> {
        if *self.failing.lock().unwrap() {
            return Err(ServiceError::Notification("topic unavailable".to_string()));
        }
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

/// Router plus handles on every fake it was built from
pub struct TestRouter {
    pub router: ModerationRouter,
    pub storage: Arc<MemoryStorage>,
    pub classifier: Arc<FakeClassifier>,
    pub audit: Arc<MemoryAuditStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn router_config() -> RouterConfig {
    RouterConfig {
        alert_topic_id: "arn:aws:sns:us-east-1:000000000000:image-firewall-alerts".to_string(),
        ..RouterConfig::default()
    }
}

pub fn build(
    classifier: FakeClassifier,
    audit: MemoryAuditStore,
    notifier: RecordingNotifier,
) -> TestRouter {
    let storage = Arc::new(MemoryStorage::new());
    let classifier = Arc::new(classifier);
    let audit = Arc::new(audit);
    let notifier = Arc::new(notifier);

    let router = ModerationRouter::new(
        router_config(),
        storage.clone(),
        classifier.clone(),
        audit.clone(),
        notifier.clone(),
    );

    TestRouter {
        router,
        storage,
        classifier,
        audit,
        notifier,
    }
}

/// Router with a classifier that returns no labels
pub fn default_router() -> TestRouter {
    build(
        FakeClassifier::new(),
        MemoryAuditStore::new(),
        RecordingNotifier::new(),
    )
}

/// S3 notification body for one object
pub fn notification(bucket: &str, key: &str) -> String {
    serde_json::json!({
        "Records": [{
            "eventSource": "aws:s3",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": { "name": bucket },
                "object": { "key": key }
            }
        }]
    })
    .to_string()
}
