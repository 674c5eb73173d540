//! Trait boundaries for the external collaborators.
//!
//! The compression algorithms never own persistent state: the raw graph
//! lives behind [`GraphStore`], and phase progress behind
//! [`CheckpointStore`].

mod checkpoint_store;
mod graph_store;

pub use checkpoint_store::CheckpointStore;
pub use graph_store::{GraphStore, GraphView};
