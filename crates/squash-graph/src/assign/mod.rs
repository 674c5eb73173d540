//! Bounded multi-source BFS core assignment.
//!
//! Every CORE claims itself at hop 0, then all fronts expand in lockstep
//! layers over the original, unpeeled graph until `max_hops`. Claims are
//! first-wins with ties broken by smallest CORE id.

mod assigner;
mod state;

#[cfg(test)]
mod tests;

pub use assigner::CoreAssigner;
pub use state::AssignmentState;
