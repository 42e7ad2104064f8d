pub mod auth;
pub mod credentials;
pub mod firestore;
pub mod json_store;
