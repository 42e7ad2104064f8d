use std::fmt;

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::model::book::{BookDocument, WriteOverrides};
use crate::domain::model::isbn::Isbn;
use crate::domain::model::record::SourceRecord;
use crate::domain::repository::{BookStore, StoredCreatedAt, UpdateFields};

use super::error::AppError;

const SEPARATOR: &str = "---------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Lookups and writes.
    #[default]
    Apply,
    /// Lookups only; writes are logged but skipped.
    DryRun,
}

impl SyncMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            Self::DryRun
        } else {
            Self::Apply
        }
    }

    pub fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Create,
    Update,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("CREATE"),
            Self::Update => f.write_str("UPDATE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub isbn: Isbn,
    pub title: String,
    pub action: SyncAction,
}

/// Result of one synchronization pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub total: usize,
    pub dry_run: bool,
    /// Per-record classification, in catalog order.
    pub outcomes: Vec<RecordOutcome>,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={}, updated={}, total={}",
            self.created, self.updated, self.total
        )
    }
}

/// Upserts catalog records into a [`BookStore`], keyed by ISBN.
///
/// Records are processed one at a time in order: one lookup, then at most one
/// write. The first failure aborts the pass.
pub struct SeedService<S: BookStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
}

impl<S: BookStore> SeedService<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: BookStore, C: Clock> SeedService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn sync(
        &self,
        records: &[SourceRecord],
        mode: SyncMode,
    ) -> Result<SyncReport, AppError> {
        let mut report = SyncReport {
            total: records.len(),
            dry_run: mode.is_dry_run(),
            ..SyncReport::default()
        };

        for (index, record) in records.iter().enumerate() {
            let action = self.upsert(record, index, mode).await?;
            match action {
                SyncAction::Create => report.created += 1,
                SyncAction::Update => report.updated += 1,
            }
            tracing::info!("[{action}] {}", record.title);
            report.outcomes.push(RecordOutcome {
                isbn: record.isbn()?,
                title: record.title.to_string(),
                action,
            });
        }

        tracing::info!("{SEPARATOR}");
        tracing::info!("Done. {report}");
        if report.dry_run {
            tracing::info!("Dry run mode: no data written.");
        }
        Ok(report)
    }

    async fn upsert(
        &self,
        record: &SourceRecord,
        index: usize,
        mode: SyncMode,
    ) -> Result<SyncAction, AppError> {
        let payload = BookDocument::from_record(record, index, self.clock.now())?;
        let isbn = payload.isbn.clone();

        let existing = self
            .store
            .find_by_isbn(&isbn)
            .await
            .map_err(|e| AppError::Lookup {
                isbn: isbn.clone(),
                source: Box::new(e),
            })?;

        match existing {
            None => {
                if !mode.is_dry_run() {
                    let id = self
                        .store
                        .create(&payload)
                        .await
                        .map_err(|e| write_error(&isbn, e))?;
                    tracing::debug!(%isbn, %id, "created document");
                }
                Ok(SyncAction::Create)
            }
            Some(stored) => {
                let (created_at, fields) = match stored.created_at {
                    StoredCreatedAt::At(t) => (Some(t), UpdateFields::All),
                    StoredCreatedAt::Absent => (None, UpdateFields::All),
                    StoredCreatedAt::Opaque => (None, UpdateFields::KeepCreatedAt),
                };
                let doc = payload.merge(WriteOverrides {
                    created_at,
                    updated_at: Some(self.clock.now()),
                });
                if !mode.is_dry_run() {
                    self.store
                        .update(&stored.id, &doc, fields)
                        .await
                        .map_err(|e| write_error(&isbn, e))?;
                    tracing::debug!(%isbn, id = %stored.id, "updated document");
                }
                Ok(SyncAction::Update)
            }
        }
    }
}

fn write_error<E>(isbn: &Isbn, source: E) -> AppError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AppError::Write {
        isbn: isbn.clone(),
        source: Box::new(source),
    }
}
