pub mod book;
pub mod isbn;
pub mod record;
