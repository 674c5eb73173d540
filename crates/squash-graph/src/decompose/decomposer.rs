//! Peel/promote decomposition loop.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use squash_core::{GraphStore, GraphView, NodeId, SquashError, SquashResult};

use super::state::DecompositionState;
use crate::step::StepOutcome;

/// Selects CORE nodes by iterative k-core peeling.
///
/// One [`step`](Self::step) is a full peel/promote cycle against the
/// residual view of the store:
///
/// 1. every live node with residual degree < k is removed, cascading as
///    removals push neighbors under the threshold;
/// 2. the surviving node of maximum residual degree is promoted to CORE
///    and removed, ties broken by smallest node id.
///
/// The loop stops once `max_cores` nodes are promoted or the residual
/// graph is empty. Deletions go through the store and only ever affect
/// its residual view.
pub struct KCoreDecomposer {
    store: Arc<dyn GraphStore>,
    k: u32,
    max_cores: usize,
}

impl std::fmt::Debug for KCoreDecomposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KCoreDecomposer")
            .field("k", &self.k)
            .field("max_cores", &self.max_cores)
            .finish_non_exhaustive()
    }
}

impl KCoreDecomposer {
    /// Rejects `k == 0` and `max_cores == 0` before any store call.
    pub fn new(store: Arc<dyn GraphStore>, k: u32, max_cores: usize) -> SquashResult<Self> {
        if k == 0 {
            return Err(SquashError::configuration("k must be >= 1"));
        }
        if max_cores == 0 {
            return Err(SquashError::configuration("max_cores must be >= 1"));
        }
        Ok(Self {
            store,
            k,
            max_cores,
        })
    }

    /// Load residual degrees from the store if this process has not yet.
    ///
    /// Returns [`SquashError::EmptyGraph`] when decomposition is invoked
    /// on a graph with zero nodes; callers treat that as "zero cores",
    /// not as a fatal failure.
    async fn ensure_degrees(&self, state: &mut DecompositionState) -> SquashResult<()> {
        if state.degrees.is_some() {
            return Ok(());
        }
        let ids = self.store.node_ids(GraphView::Residual).await?;
        if ids.is_empty() && state.removed == 0 && state.cores.is_empty() {
            return Err(SquashError::EmptyGraph);
        }
        let mut by_id = self.store.bulk_degree(&ids).await?;
        let degrees: BTreeMap<NodeId, usize> = ids
            .into_iter()
            .map(|id| {
                let degree = by_id.remove(&id).unwrap_or(0);
                (id, degree)
            })
            .collect();
        debug!(live_nodes = degrees.len(), "loaded residual degrees");
        state.degrees = Some(degrees);
        Ok(())
    }

    /// Run one peel/promote cycle. The state is checkpoint-safe after
    /// every return.
    pub async fn step(&self, state: &mut DecompositionState) -> SquashResult<StepOutcome> {
        if state.exhausted || state.cores.len() >= self.max_cores {
            return Ok(StepOutcome::Done);
        }
        self.ensure_degrees(state).await?;
        let degrees = state.degrees.get_or_insert_with(BTreeMap::new);

        // Peel: seed the frontier with every live node under the
        // threshold, then drain it. Removals decrement neighbor degrees,
        // which may push more nodes into the frontier.
        for (id, degree) in degrees.iter() {
            if *degree < self.k as usize {
                state.frontier.insert(id.clone());
            }
        }
        while let Some(node) = state.frontier.pop_first() {
            let neighbors = self.store.neighbors(&node, GraphView::Residual).await?;
            self.store.delete_node(&node).await?;
            if degrees.remove(&node).is_none() {
                // Stale frontier entry from an interrupted cycle.
                continue;
            }
            state.removed += 1;
            for neighbor in neighbors {
                if let Some(degree) = degrees.get_mut(&neighbor) {
                    *degree = degree.saturating_sub(1);
                    if *degree < self.k as usize {
                        state.frontier.insert(neighbor);
                    }
                }
            }
        }

        // Promote: maximum residual degree, ties broken by smallest id.
        // BTreeMap iterates in id order and the comparison is strict, so
        // the first maximum seen is the smallest-id winner.
        let mut best: Option<(&NodeId, usize)> = None;
        for (id, degree) in degrees.iter() {
            match best {
                Some((_, best_degree)) if *degree <= best_degree => {}
                _ => best = Some((id, *degree)),
            }
        }
        let Some((core, core_degree)) = best.map(|(id, d)| (id.clone(), d)) else {
            debug!(
                n_cores = state.cores.len(),
                removed = state.removed,
                "residual graph exhausted before max_cores"
            );
            state.exhausted = true;
            return Ok(StepOutcome::Done);
        };

        let neighbors = self.store.neighbors(&core, GraphView::Residual).await?;
        self.store.delete_node(&core).await?;
        degrees.remove(&core);
        for neighbor in neighbors {
            if let Some(degree) = degrees.get_mut(&neighbor) {
                *degree = degree.saturating_sub(1);
                if *degree < self.k as usize {
                    state.frontier.insert(neighbor);
                }
            }
        }
        state.cores.push(core.clone());
        debug!(
            core = %core,
            degree = core_degree,
            n_cores = state.cores.len(),
            removed = state.removed,
            "promoted core node"
        );

        if state.cores.len() >= self.max_cores {
            return Ok(StepOutcome::Done);
        }
        if degrees.is_empty() {
            state.exhausted = true;
            return Ok(StepOutcome::Done);
        }
        Ok(StepOutcome::Continue)
    }

    /// Drive [`step`](Self::step) to completion and return the CORE ids
    /// in promotion order.
    pub async fn decompose(&self, state: &mut DecompositionState) -> SquashResult<Vec<NodeId>> {
        while self.step(state).await? == StepOutcome::Continue {}
        Ok(state.cores.clone())
    }
}
