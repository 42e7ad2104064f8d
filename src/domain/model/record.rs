use super::isbn::Isbn;
use crate::domain::error::DomainError;

/// Catalog entry compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRecord {
    pub title: &'static str,
    pub author: &'static str,
    pub isbn: &'static str,
    pub category: &'static str,
    /// Publication year as written in the catalog ("2008").
    pub published_date: &'static str,
    pub description: &'static str,
}

impl SourceRecord {
    pub fn isbn(&self) -> Result<Isbn, DomainError> {
        Isbn::parse(self.isbn)
    }
}
