use crate::domain::error::DomainError;
use crate::domain::model::isbn::Isbn;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("lookup failed for ISBN {isbn}")]
    Lookup {
        isbn: Isbn,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("write failed for ISBN {isbn}")]
    Write {
        isbn: Isbn,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
