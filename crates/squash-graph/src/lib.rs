//! Graph compression via iterative k-core decomposition.
//!
//! Compresses a large graph (millions of nodes and edges) into a small
//! representative graph (hundreds of nodes) that preserves overall
//! structure for visualization and analysis. The pipeline has three strict
//! phases:
//!
//! 1. **decompose**: peel nodes of residual degree < k and repeatedly
//!    promote the highest-degree survivor to CORE status, bounded by
//!    `max_cores`.
//! 2. **assign**: multi-source BFS over the original graph claims every
//!    remaining node for exactly one CORE within `max_hops`.
//! 3. **aggregate**: raw edges are folded into weighted CORE-to-CORE edges
//!    with distinct-contribution counts and a derived score.
//!
//! The [`orchestrator::GraphSquasher`] sequences the phases, persists a
//! checkpoint after every peel/promote cycle, BFS front expansion, and
//! edge batch, and resumes from the last checkpoint after interruption.
//! Tie-breaks are deterministic throughout (smallest node id on promotion
//! ties, smallest CORE id on claim ties), so identical parameters against
//! an unchanged graph reproduce identical output.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use squash_core::{InMemoryCheckpointStore, InMemoryGraphStore, SquashConfig};
//! use squash_graph::GraphSquasher;
//!
//! let store = Arc::new(InMemoryGraphStore::from_edges(edges));
//! let checkpoints = Arc::new(InMemoryCheckpointStore::new());
//! let squasher = GraphSquasher::new(store, checkpoints, SquashConfig::new(2, 500, 3))?;
//!
//! let report = squasher.squash_graph().await?;
//! let cores = squasher.get_core_node_list().await?;
//! let edges = squasher.get_core_edge_list().await?;
//! ```

pub mod aggregate;
pub mod assign;
pub mod decompose;
pub mod orchestrator;
mod step;

pub use aggregate::{AggregationState, EdgeAggregator};
pub use assign::{AssignmentState, CoreAssigner};
pub use decompose::{DecompositionState, KCoreDecomposer};
pub use orchestrator::{GraphSquasher, Phase, RunOutcome, SquashCheckpoint, SquashReport};
pub use step::StepOutcome;
