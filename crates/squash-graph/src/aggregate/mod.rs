//! Aggregation of raw edges into weighted CORE-to-CORE edges.

mod aggregator;
mod state;

#[cfg(test)]
mod tests;

pub use aggregator::EdgeAggregator;
pub use state::{AggregationState, EdgeAccumulator};
