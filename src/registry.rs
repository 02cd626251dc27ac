use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub filename: String,
    pub path: PathBuf,
    pub content_length: usize,
    pub uploaded_at: DateTime<Utc>,
}

/// Uploaded documents addressable by id
#[derive(Clone, Default)]
pub struct DocumentRegistry {
    inner: Arc<RwLock<HashMap<Uuid, DocumentRecord>>>,
}

impl DocumentRegistry {
    pub async fn insert(&self, record: DocumentRecord) {
        let mut guard = self.inner.write().await;
        guard.insert(record.id, record);
    }

    pub async fn get(&self, id: &Uuid) -> Option<DocumentRecord> {
        let guard = self.inner.read().await;
        guard.get(id).cloned()
    }

    /// Most recently uploaded document
    pub async fn latest(&self) -> Option<DocumentRecord> {
        let guard = self.inner.read().await;
        guard.values().max_by_key(|record| record.uploaded_at).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
