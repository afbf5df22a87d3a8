//! TaskDeck client library.
//!
//! The task store at the center of this crate presents one operation surface
//! (`load`, `add`, `update`, `toggle`, `delete`) regardless of whether the
//! remote task service or the on-device fallback blob answers a given call.

pub mod api;
pub mod config;
pub mod fallback;
pub mod store;
