//! Adapters implementing the domain ports.

pub mod broadcast;
pub mod identity;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
