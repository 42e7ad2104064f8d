use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::model::book::BookDocument;
use crate::domain::model::isbn::Isbn;
use crate::domain::repository::{BookStore, DocumentId, StoredBook, StoredCreatedAt, UpdateFields};

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document not found: {0}")]
    NotFound(DocumentId),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    documents: BTreeMap<String, BookDocument>,
}

/// File-backed `BookStore`. The whole collection lives in one JSON file.
pub struct JsonBookStore {
    path: PathBuf,
}

impl JsonBookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Every stored document, keyed by id.
    pub async fn documents(&self) -> Result<BTreeMap<String, BookDocument>, JsonStoreError> {
        Ok(self.load().await?.documents)
    }

    async fn load(&self) -> Result<Snapshot, JsonStoreError> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(Snapshot::default());
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), JsonStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl BookStore for JsonBookStore {
    type Error = JsonStoreError;

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<StoredBook>, Self::Error> {
        let snapshot = self.load().await?;
        Ok(snapshot
            .documents
            .into_iter()
            .find(|(_, doc)| doc.isbn == *isbn)
            .map(|(id, doc)| StoredBook {
                id: DocumentId::new(id),
                created_at: StoredCreatedAt::At(doc.created_at),
            }))
    }

    async fn create(&self, doc: &BookDocument) -> Result<DocumentId, Self::Error> {
        let mut snapshot = self.load().await?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        snapshot.documents.insert(id.clone(), doc.clone());
        self.save(&snapshot).await?;
        Ok(DocumentId::new(id))
    }

    async fn update(
        &self,
        id: &DocumentId,
        doc: &BookDocument,
        fields: UpdateFields,
    ) -> Result<(), Self::Error> {
        let mut snapshot = self.load().await?;
        let slot = snapshot
            .documents
            .get_mut(id.as_str())
            .ok_or_else(|| JsonStoreError::NotFound(id.clone()))?;
        let created_at = slot.created_at;
        *slot = doc.clone();
        if !fields.writes_created_at() {
            slot.created_at = created_at;
        }
        self.save(&snapshot).await?;
        Ok(())
    }
}
