//! Resumable compression orchestration.
//!
//! Sequences the three phases, persists a checkpoint between every unit
//! of work, and exposes the compressed node/edge lists once a run reaches
//! `COMPLETE`.

mod checkpoint;
mod phase;
mod report;
mod squasher;

#[cfg(test)]
mod tests;

pub use checkpoint::{RunParams, SquashCheckpoint};
pub use phase::Phase;
pub use report::{RunOutcome, SquashReport};
pub use squasher::GraphSquasher;
