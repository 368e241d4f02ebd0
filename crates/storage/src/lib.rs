//! Storage layer for Campus Bites
//!
//! This crate provides the on-device key-value store and the versioned
//! snapshot records the state stores persist through.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;
pub mod snapshots;

pub use kv::{KvConfig, KvError, KvStore};
pub use snapshots::{SnapshotError, SnapshotStore};
