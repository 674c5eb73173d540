//! Core types and collaborator traits for graph compression.
//!
//! This crate provides the shared vocabulary for the graph-squash system:
//! node/edge types, the error taxonomy, run configuration, and the trait
//! boundaries behind which the external collaborators live.
//!
//! # Architecture
//!
//! - **types**: `NodeId`, `RawEdge`, `CoreNode`, `CoreEdge`, `Assignment`
//! - **error**: `SquashError` taxonomy with `SquashResult` alias
//! - **config**: `SquashConfig` with validation, score strategy, self-loop policy
//! - **traits**: `GraphStore` (degree/neighbor/delete/edge-scan) and
//!   `CheckpointStore` (phase progress persistence)
//! - **store**: `InMemoryGraphStore` / `InMemoryCheckpointStore` backings
//! - **retry**: `RetryingStore`, bounded-backoff wrapper over any `GraphStore`
//!
//! The compression algorithms themselves live in `squash-graph`; a durable
//! RocksDB checkpoint store lives in `squash-storage`.

pub mod config;
pub mod error;
pub mod retry;
pub mod store;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod stubs;

// Re-exports for convenience
pub use config::{RetryPolicy, ScoreStrategy, SelfLoopPolicy, SquashConfig};
pub use error::{SquashError, SquashResult};
pub use retry::RetryingStore;
pub use store::{InMemoryCheckpointStore, InMemoryGraphStore};
pub use traits::{CheckpointStore, GraphStore, GraphView};
pub use types::{Assignment, Claim, CoreEdge, CoreNode, NodeId, RawEdge};
