//! Cache
//!
//! Este módulo contiene el cache en memoria del último snapshot conocido.

pub mod snapshot_cache;

pub use snapshot_cache::{Identified, Snapshot, SnapshotCache, SnapshotSlot};
