//! Batched edge scan and CORE edge construction.

use std::sync::Arc;

use tracing::debug;

use squash_core::{
    Assignment, CoreEdge, GraphStore, ScoreStrategy, SelfLoopPolicy, SquashResult,
};

use super::state::AggregationState;
use crate::step::StepOutcome;

/// Folds the original edge list into weighted CORE-to-CORE edges.
///
/// For every raw edge `(u, v, w)` the endpoints are resolved through the
/// assignment. Edges with an unassigned endpoint are dropped and counted.
/// Intra-group edges follow the configured [`SelfLoopPolicy`]: discarded
/// (default) or folded into a CORE self-loop. Everything else accumulates
/// into the unordered CORE pair: weight summed, distinct contributions
/// counted. Scores are computed once, at finalization, by the configured
/// [`ScoreStrategy`].
pub struct EdgeAggregator {
    store: Arc<dyn GraphStore>,
    batch_size: usize,
    self_loop_policy: SelfLoopPolicy,
    score_strategy: ScoreStrategy,
}

impl EdgeAggregator {
    pub fn new(
        store: Arc<dyn GraphStore>,
        batch_size: usize,
        self_loop_policy: SelfLoopPolicy,
        score_strategy: ScoreStrategy,
    ) -> Self {
        Self {
            store,
            batch_size,
            self_loop_policy,
            score_strategy,
        }
    }

    /// Scan and accumulate one edge batch. Checkpoint-safe after every
    /// return.
    pub async fn step(
        &self,
        assignment: &Assignment,
        state: &mut AggregationState,
    ) -> SquashResult<StepOutcome> {
        if state.done {
            return Ok(StepOutcome::Done);
        }
        let batch = self.store.scan_edges(state.cursor, self.batch_size).await?;
        if batch.is_empty() {
            debug!(
                scanned = state.scanned,
                core_pairs = state.accum.len(),
                dropped_unassigned = state.dropped_unassigned,
                intra_group = state.intra_group,
                "edge scan complete"
            );
            state.done = true;
            return Ok(StepOutcome::Done);
        }
        state.cursor += batch.len() as u64;

        for edge in batch {
            state.scanned += 1;
            let (Some(source_core), Some(target_core)) = (
                assignment.core_of(&edge.source),
                assignment.core_of(&edge.target),
            ) else {
                state.dropped_unassigned += 1;
                continue;
            };
            let key = if source_core == target_core {
                state.intra_group += 1;
                match self.self_loop_policy {
                    SelfLoopPolicy::Discard => continue,
                    SelfLoopPolicy::Fold => (source_core.clone(), target_core.clone()),
                }
            } else if source_core < target_core {
                (source_core.clone(), target_core.clone())
            } else {
                (target_core.clone(), source_core.clone())
            };
            let accumulator = state.accum.entry(key).or_default();
            accumulator.weight += edge.weight;
            accumulator.n_distinct += 1;
        }
        Ok(StepOutcome::Continue)
    }

    /// Turn the accumulators into the final CORE edge list, ordered by
    /// `(source, target)`.
    pub fn finalize(&self, state: &AggregationState) -> Vec<CoreEdge> {
        state
            .accum
            .iter()
            .map(|((source, target), acc)| CoreEdge {
                source: source.clone(),
                target: target.clone(),
                weight: acc.weight,
                n_distinct: acc.n_distinct,
                score: self.score_strategy.score(acc.weight, acc.n_distinct),
            })
            .collect()
    }

    /// Drive [`step`](Self::step) to completion and finalize.
    pub async fn aggregate(
        &self,
        assignment: &Assignment,
        state: &mut AggregationState,
    ) -> SquashResult<Vec<CoreEdge>> {
        while self.step(assignment, state).await? == StepOutcome::Continue {}
        Ok(self.finalize(state))
    }
}
