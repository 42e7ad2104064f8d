//! Firestore-backed [`BookStore`] over the REST API.

pub mod client;
pub mod codec;

use async_trait::async_trait;

use crate::domain::model::book::BookDocument;
use crate::domain::model::isbn::Isbn;
use crate::domain::repository::{BookStore, DocumentId, StoredBook, UpdateFields};

pub use client::{Document, FirestoreClient, FirestoreError};

pub const DEFAULT_COLLECTION: &str = "books";

pub struct FirestoreBookStore {
    client: FirestoreClient,
    collection: String,
}

impl FirestoreBookStore {
    pub fn new(client: FirestoreClient, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    pub fn client(&self) -> &FirestoreClient {
        &self.client
    }
}

#[async_trait]
impl BookStore for FirestoreBookStore {
    type Error = FirestoreError;

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<StoredBook>, Self::Error> {
        let query = codec::isbn_query(&self.collection, isbn);
        let docs = self.client.run_query(&query).await?;
        Ok(docs.into_iter().next().map(stored_book))
    }

    async fn create(&self, doc: &BookDocument) -> Result<DocumentId, Self::Error> {
        let fields = codec::encode_document(doc);
        let created = self
            .client
            .create_document(&self.collection, &fields)
            .await?;
        Ok(DocumentId::new(created.name))
    }

    async fn update(
        &self,
        id: &DocumentId,
        doc: &BookDocument,
        fields: UpdateFields,
    ) -> Result<(), Self::Error> {
        let mask = fields.field_paths();
        let mut encoded = codec::encode_document(doc);
        encoded.retain(|path, _| mask.contains(path));
        self.client.patch_document(id.as_str(), &encoded, &mask).await?;
        Ok(())
    }
}

/// The document's full resource name doubles as its id for later `PATCH`es.
fn stored_book(doc: Document) -> StoredBook {
    StoredBook {
        created_at: codec::decode_created_at(&doc.fields),
        id: DocumentId::new(doc.name),
    }
}
