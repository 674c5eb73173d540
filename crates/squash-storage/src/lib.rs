//! Durable checkpoint persistence for compression runs.
//!
//! Provides [`RocksDbCheckpointStore`], a RocksDB-backed implementation
//! of the `CheckpointStore` trait from `squash-core`, so an interrupted
//! compression run survives process restarts. Checkpoints are opaque
//! blobs keyed by run id; one column family holds them, a second holds
//! rarely-touched store metadata.

mod column_families;
mod error;
mod rocksdb_store;

pub use column_families::{cf_names, get_column_family_descriptors, get_db_options};
pub use error::StorageError;
pub use rocksdb_store::RocksDbCheckpointStore;
