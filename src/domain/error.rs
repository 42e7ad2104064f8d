#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("invalid ISBN-13: {0:?}")]
    InvalidIsbn(String),

    #[error("ISBN-13 check digit mismatch: {0:?}")]
    IsbnChecksum(String),

    #[error("invalid inventory: {available} available of {total} total")]
    InvalidInventory { total: u32, available: u32 },
}
