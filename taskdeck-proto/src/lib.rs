//! Shared data model and API payload types for TaskDeck.

pub mod api;
pub mod stats;
pub mod task;
