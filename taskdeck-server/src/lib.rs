//! TaskDeck task service library.
//!
//! Exposes the HTTP API server for use in tests and embedding. The server
//! persists tasks in a document-style repository and serves the CRUD,
//! filter, stats, and health routes under `/api`.

pub mod api;
pub mod config;
pub mod repo;
