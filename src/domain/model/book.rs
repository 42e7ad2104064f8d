use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::isbn::Isbn;
use super::record::SourceRecord;
use crate::domain::error::DomainError;

const COVER_BASE_URL: &str = "https://covers.openlibrary.org/b/isbn";

/// Open Library large cover for the given ISBN.
pub fn cover_url(isbn: &Isbn) -> String {
    format!("{COVER_BASE_URL}/{isbn}-L.jpg")
}

/// Copy counts of a seeded book. Always `1 <= available <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    total_copies: u32,
    available_copies: u32,
}

impl Inventory {
    pub fn new(total_copies: u32, available_copies: u32) -> Result<Self, DomainError> {
        if available_copies == 0 || available_copies > total_copies {
            return Err(DomainError::InvalidInventory {
                total: total_copies,
                available: available_copies,
            });
        }
        Ok(Self {
            total_copies,
            available_copies,
        })
    }

    /// Seed inventory derived from the record's catalog position.
    ///
    /// `total = 2 + index % 5`, `available = max(1, total - index % 3)`.
    pub fn for_position(index: usize) -> Self {
        let total_copies = 2 + (index % 5) as u32;
        let available_copies = total_copies.saturating_sub((index % 3) as u32).max(1);
        Self {
            total_copies,
            available_copies,
        }
    }

    pub fn total_copies(&self) -> u32 {
        self.total_copies
    }

    pub fn available_copies(&self) -> u32 {
        self.available_copies
    }
}

/// Persisted shape of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDocument {
    pub title: String,
    pub author: String,
    pub isbn: Isbn,
    pub description: String,
    pub cover_url: String,
    pub category: String,
    #[serde(flatten)]
    pub inventory: Inventory,
    pub published_date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields that replace the freshly built payload's values on write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOverrides {
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookDocument {
    /// Stored field names, in payload order.
    pub const FIELD_PATHS: [&'static str; 11] = [
        "title",
        "author",
        "isbn",
        "description",
        "coverUrl",
        "category",
        "totalCopies",
        "availableCopies",
        "publishedDate",
        "createdAt",
        "updatedAt",
    ];

    pub const CREATED_AT_PATH: &'static str = "createdAt";

    /// Full payload for the record at `index`. Both timestamps are `now`.
    pub fn from_record(
        record: &SourceRecord,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let isbn = record.isbn()?;
        Ok(Self {
            title: record.title.to_string(),
            author: record.author.to_string(),
            cover_url: cover_url(&isbn),
            isbn,
            description: record.description.to_string(),
            category: record.category.to_string(),
            inventory: Inventory::for_position(index),
            published_date: record.published_date.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies overrides on top of this payload. `None` keeps the base value.
    pub fn merge(self, overrides: WriteOverrides) -> Self {
        Self {
            created_at: overrides.created_at.unwrap_or(self.created_at),
            updated_at: overrides.updated_at.unwrap_or(self.updated_at),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clean_code() -> SourceRecord {
        SourceRecord {
            title: "Clean Code",
            author: "Robert C. Martin",
            isbn: "9780132350884",
            category: "Informatique",
            published_date: "2008",
            description: "A handbook of agile software craftsmanship.",
        }
    }

    #[test]
    fn inventory_follows_position() {
        let cases = [(0, 2, 2), (1, 3, 2), (3, 5, 5), (5, 2, 1), (25, 2, 1), (29, 6, 4)];
        for (index, total, available) in cases {
            let inv = Inventory::for_position(index);
            assert_eq!(inv.total_copies(), total, "total at {index}");
            assert_eq!(inv.available_copies(), available, "available at {index}");
        }
    }

    #[test]
    fn inventory_new_validates_bounds() {
        assert!(Inventory::new(3, 3).is_ok());
        assert!(matches!(
            Inventory::new(3, 0),
            Err(DomainError::InvalidInventory { .. })
        ));
        assert!(matches!(
            Inventory::new(2, 3),
            Err(DomainError::InvalidInventory { .. })
        ));
    }

    #[test]
    fn from_record_builds_full_payload() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let doc = BookDocument::from_record(&clean_code(), 0, now).unwrap();

        assert_eq!(doc.title, "Clean Code");
        assert_eq!(doc.isbn.as_str(), "9780132350884");
        assert_eq!(
            doc.cover_url,
            "https://covers.openlibrary.org/b/isbn/9780132350884-L.jpg"
        );
        assert_eq!(doc.inventory, Inventory::new(2, 2).unwrap());
        assert_eq!(doc.published_date, "2008");
        assert_eq!(doc.created_at, now);
        assert_eq!(doc.updated_at, now);
    }

    #[test]
    fn from_record_rejects_bad_isbn() {
        let mut record = clean_code();
        record.isbn = "not-an-isbn";
        assert!(BookDocument::from_record(&record, 0, Utc::now()).is_err());
    }

    #[test]
    fn merge_overrides_only_given_fields() {
        let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 1).unwrap();
        let base = BookDocument::from_record(&clean_code(), 0, t1).unwrap();

        let kept = base.clone().merge(WriteOverrides::default());
        assert_eq!(kept, base);

        let merged = base.clone().merge(WriteOverrides {
            created_at: Some(t0),
            updated_at: Some(t2),
        });
        assert_eq!(merged.created_at, t0);
        assert_eq!(merged.updated_at, t2);
        assert_eq!(merged.title, base.title);
    }

    #[test]
    fn serializes_with_stored_field_names() {
        let doc = BookDocument::from_record(&clean_code(), 0, Utc::now()).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected = BookDocument::FIELD_PATHS.to_vec();
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }
}
