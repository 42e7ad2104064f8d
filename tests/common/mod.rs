//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use book_seeder::domain::clock::Clock;
use book_seeder::domain::model::book::BookDocument;
use book_seeder::domain::model::isbn::Isbn;
use book_seeder::domain::repository::{
    BookStore, DocumentId, StoredBook, StoredCreatedAt, UpdateFields,
};

// =============================================================================
// InMemoryStore: BookStore without any I/O
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InMemoryError {
    #[error("document not found: {0}")]
    NotFound(DocumentId),
    #[error("injected failure on {0}")]
    Injected(&'static str),
}

/// Which call should fail, and after how many successful ones.
#[derive(Debug, Clone, Copy)]
pub enum FailOn {
    Lookup(usize),
    Write(usize),
}

#[derive(Default)]
pub struct InMemoryStore {
    docs: Mutex<BTreeMap<String, BookDocument>>,
    next_id: AtomicUsize,
    lookups: AtomicUsize,
    writes: AtomicUsize,
    fail_on: Option<FailOn>,
    /// Ids whose stored `createdAt` reads back as something other than a timestamp.
    opaque_created_at: Mutex<BTreeSet<String>>,
    updates: Mutex<Vec<UpdateFields>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(fail_on: FailOn) -> Self {
        Self {
            fail_on: Some(fail_on),
            ..Self::default()
        }
    }

    /// Inserts a document directly, bypassing the write counter.
    pub fn seed(&self, doc: BookDocument) -> DocumentId {
        let id = self.allocate_id();
        self.docs.lock().unwrap().insert(id.clone(), doc);
        DocumentId::new(id)
    }

    /// Like [`seed`](Self::seed), but `createdAt` is reported as unreadable.
    pub fn seed_with_opaque_created_at(&self, doc: BookDocument) -> DocumentId {
        let id = self.seed(doc);
        self.opaque_created_at
            .lock()
            .unwrap()
            .insert(id.as_str().to_string());
        id
    }

    /// Field sets passed to each successful `update`, in call order.
    pub fn updates(&self) -> Vec<UpdateFields> {
        self.updates.lock().unwrap().clone()
    }

    pub fn documents(&self) -> Vec<BookDocument> {
        self.docs.lock().unwrap().values().cloned().collect()
    }

    pub fn find(&self, isbn: &str) -> Vec<BookDocument> {
        self.documents()
            .into_iter()
            .filter(|d| d.isbn.as_str() == isbn)
            .collect()
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn allocate_id(&self) -> String {
        format!("doc-{:03}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn check_write(&self) -> Result<(), InMemoryError> {
        let done = self.writes.fetch_add(1, Ordering::SeqCst);
        match self.fail_on {
            Some(FailOn::Write(n)) if done == n => Err(InMemoryError::Injected("write")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl BookStore for InMemoryStore {
    type Error = InMemoryError;

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<StoredBook>, Self::Error> {
        let done = self.lookups.fetch_add(1, Ordering::SeqCst);
        if matches!(self.fail_on, Some(FailOn::Lookup(n)) if done == n) {
            return Err(InMemoryError::Injected("lookup"));
        }
        let docs = self.docs.lock().unwrap();
        let opaque = self.opaque_created_at.lock().unwrap();
        Ok(docs
            .iter()
            .find(|(_, d)| d.isbn == *isbn)
            .map(|(id, d)| StoredBook {
                id: DocumentId::new(id.clone()),
                created_at: if opaque.contains(id) {
                    StoredCreatedAt::Opaque
                } else {
                    StoredCreatedAt::At(d.created_at)
                },
            }))
    }

    async fn create(&self, doc: &BookDocument) -> Result<DocumentId, Self::Error> {
        self.check_write()?;
        let id = self.allocate_id();
        self.docs.lock().unwrap().insert(id.clone(), doc.clone());
        Ok(DocumentId::new(id))
    }

    async fn update(
        &self,
        id: &DocumentId,
        doc: &BookDocument,
        fields: UpdateFields,
    ) -> Result<(), Self::Error> {
        self.check_write()?;
        let mut docs = self.docs.lock().unwrap();
        let slot = docs
            .get_mut(id.as_str())
            .ok_or_else(|| InMemoryError::NotFound(id.clone()))?;
        let created_at = slot.created_at;
        *slot = doc.clone();
        if !fields.writes_created_at() {
            slot.created_at = created_at;
        }
        self.updates.lock().unwrap().push(fields);
        Ok(())
    }
}

// =============================================================================
// StepClock: advances one second per reading
// =============================================================================

pub struct StepClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl StepClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            start,
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + Duration::seconds(tick)
    }
}

impl Clock for &StepClock {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

pub fn t(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// All fields except `updatedAt`, for comparing runs.
pub fn without_updated_at(mut docs: Vec<BookDocument>) -> Vec<BookDocument> {
    for doc in &mut docs {
        doc.updated_at = doc.created_at;
    }
    docs.sort_by(|a, b| a.isbn.cmp(&b.isbn));
    docs
}
