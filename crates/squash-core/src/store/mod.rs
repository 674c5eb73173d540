//! In-memory collaborator implementations.
//!
//! Suitable for graphs that fit in process memory and for tests. Durable
//! checkpoint storage lives in the `squash-storage` crate.

mod memory_checkpoint;
mod memory_graph;

pub use memory_checkpoint::InMemoryCheckpointStore;
pub use memory_graph::InMemoryGraphStore;
