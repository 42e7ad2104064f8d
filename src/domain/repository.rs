use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::book::BookDocument;
use super::model::isbn::Isbn;

/// Store-assigned identifier of a persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `createdAt` as found on an existing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredCreatedAt {
    /// Missing or falsy. The payload's timestamp is written.
    Absent,
    At(DateTime<Utc>),
    /// Set to something that is not a timestamp. Left as stored.
    Opaque,
}

/// The part of an existing document the synchronizer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBook {
    pub id: DocumentId,
    pub created_at: StoredCreatedAt,
}

/// Which payload fields an update writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateFields {
    #[default]
    All,
    /// Every field except `createdAt`.
    KeepCreatedAt,
}

impl UpdateFields {
    pub fn writes_created_at(self) -> bool {
        matches!(self, Self::All)
    }

    /// Field paths to send as the update mask.
    pub fn field_paths(self) -> Vec<&'static str> {
        BookDocument::FIELD_PATHS
            .iter()
            .copied()
            .filter(|path| self.writes_created_at() || *path != BookDocument::CREATED_AT_PATH)
            .collect()
    }
}

/// Book collection abstraction. Implemented by the infra layer.
#[async_trait]
pub trait BookStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// First document whose `isbn` field equals `isbn`, if any.
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<StoredBook>, Self::Error>;

    /// Inserts a new document and returns its store-assigned id.
    async fn create(&self, doc: &BookDocument) -> Result<DocumentId, Self::Error>;

    /// Overwrites the `fields` subset of an existing document's payload.
    async fn update(
        &self,
        id: &DocumentId,
        doc: &BookDocument,
        fields: UpdateFields,
    ) -> Result<(), Self::Error>;
}

#[async_trait]
impl<'a, T: BookStore + ?Sized> BookStore for &'a T {
    type Error = T::Error;

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<StoredBook>, Self::Error> {
        (**self).find_by_isbn(isbn).await
    }

    async fn create(&self, doc: &BookDocument) -> Result<DocumentId, Self::Error> {
        (**self).create(doc).await
    }

    async fn update(
        &self,
        id: &DocumentId,
        doc: &BookDocument,
        fields: UpdateFields,
    ) -> Result<(), Self::Error> {
        (**self).update(id, doc, fields).await
    }
}
