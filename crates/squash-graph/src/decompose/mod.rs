//! Iterative k-core decomposition.
//!
//! Selects a bounded, ordered set of CORE nodes by alternately peeling
//! low-degree nodes and promoting the highest-degree survivor. State is
//! checkpointable after every cycle.

mod decomposer;
mod state;

#[cfg(test)]
mod tests;

pub use decomposer::KCoreDecomposer;
pub use state::DecompositionState;
