//! Lockstep BFS expansion of core fronts.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use squash_core::{GraphStore, GraphView, NodeId, SquashResult};

use super::state::AssignmentState;
use crate::step::StepOutcome;

/// Claims every reachable node for exactly one CORE.
///
/// All CORE fronts advance in shared hop layers: at hop `h`, an unassigned
/// node adjacent to a node claimed at `h - 1` is claimed at distance `h`.
/// Within a layer the fronts expand in ascending CORE-id order and claims
/// are first-wins, which implements the documented tie-break: a node
/// reachable from several COREs at the same distance goes to the smallest
/// CORE id. CORE nodes themselves are never reassigned.
///
/// Expansion always reads the original, unpeeled adjacency; nodes peeled
/// during decomposition are still claimable.
pub struct CoreAssigner {
    store: Arc<dyn GraphStore>,
    max_hops: u32,
}

impl CoreAssigner {
    pub fn new(store: Arc<dyn GraphStore>, max_hops: u32) -> Self {
        Self { store, max_hops }
    }

    /// Make the hop-0 self-claims and seed one front per CORE.
    pub fn initialize(&self, cores: &[NodeId], state: &mut AssignmentState) {
        for core in cores {
            state.assignment.claim(core.clone(), core.clone(), 0);
            state
                .fronts
                .insert(core.clone(), BTreeSet::from([core.clone()]));
        }
        state.hop = 1;
        state.pending = cores.iter().cloned().collect();
        state.initialized = true;
        if cores.is_empty() || self.max_hops == 0 {
            state.done = true;
        }
        debug!(
            n_cores = cores.len(),
            max_hops = self.max_hops,
            "assignment initialized"
        );
    }

    /// Expand one CORE front at the current hop, or roll over to the next
    /// layer once every front expanded. Checkpoint-safe after every
    /// return.
    pub async fn step(&self, state: &mut AssignmentState) -> SquashResult<StepOutcome> {
        if state.done {
            return Ok(StepOutcome::Done);
        }

        if let Some(core) = state.pending.pop_first() {
            let front = state.fronts.get(&core).cloned().unwrap_or_default();
            let mut new_front = BTreeSet::new();
            for node in front {
                let neighbors = self.store.neighbors(&node, GraphView::Original).await?;
                for neighbor in neighbors {
                    if state
                        .assignment
                        .claim(neighbor.clone(), core.clone(), state.hop)
                    {
                        new_front.insert(neighbor);
                    }
                }
            }
            debug!(
                core = %core,
                hop = state.hop,
                claimed = new_front.len(),
                total_assigned = state.assignment.len(),
                "expanded core front"
            );
            if !new_front.is_empty() {
                state.next_fronts.insert(core, new_front);
            }
            return Ok(StepOutcome::Continue);
        }

        // Layer complete: advance every front by one hop.
        state.fronts = std::mem::take(&mut state.next_fronts);
        state.hop += 1;
        if state.fronts.is_empty() || state.hop > self.max_hops {
            debug!(
                hop = state.hop,
                total_assigned = state.assignment.len(),
                "assignment complete"
            );
            state.done = true;
            return Ok(StepOutcome::Done);
        }
        state.pending = state.fronts.keys().cloned().collect();
        Ok(StepOutcome::Continue)
    }

    /// Initialize if needed, then drive [`step`](Self::step) to
    /// completion.
    pub async fn assign(&self, cores: &[NodeId], state: &mut AssignmentState) -> SquashResult<()> {
        if !state.initialized {
            self.initialize(cores, state);
        }
        while self.step(state).await? == StepOutcome::Continue {}
        Ok(())
    }
}
