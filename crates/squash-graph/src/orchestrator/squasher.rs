//! The compression orchestrator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use squash_core::{
    CheckpointStore, CoreEdge, CoreNode, GraphStore, GraphView, RetryingStore, SquashConfig,
    SquashError, SquashResult,
};

use super::checkpoint::{RunParams, SquashCheckpoint};
use super::phase::Phase;
use super::report::{RunOutcome, SquashReport};
use crate::aggregate::EdgeAggregator;
use crate::assign::CoreAssigner;
use crate::decompose::KCoreDecomposer;
use crate::step::StepOutcome;

/// Sequences decomposition, assignment, and aggregation into one
/// resumable compression run.
///
/// A checkpoint is persisted between every unit of phase work, so the
/// process can be killed between any two checkpoints and re-invoked
/// without losing progress. Checkpoint read-modify-write is a critical
/// section: a second concurrent `squash_graph` (or `reset`) against the
/// same squasher fails with [`SquashError::RunInProgress`] instead of
/// corrupting state. Read-only accessors never take the writer lock.
///
/// Re-invoking with identical parameters against an unchanged graph and a
/// `COMPLETE` checkpoint short-circuits and returns the prior result.
pub struct GraphSquasher {
    store: Arc<dyn GraphStore>,
    checkpoints: Arc<dyn CheckpointStore>,
    config: SquashConfig,
    run_lock: Mutex<()>,
    cancelled: AtomicBool,
}

impl std::fmt::Debug for GraphSquasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphSquasher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GraphSquasher {
    /// Validates the configuration and wraps the store with the retry
    /// policy. No collaborator call is made here.
    pub fn new(
        store: Arc<dyn GraphStore>,
        checkpoints: Arc<dyn CheckpointStore>,
        config: SquashConfig,
    ) -> SquashResult<Self> {
        config.validate()?;
        let store: Arc<dyn GraphStore> = Arc::new(RetryingStore::new(store, config.retry));
        Ok(Self {
            store,
            checkpoints,
            config,
            run_lock: Mutex::new(()),
            cancelled: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &SquashConfig {
        &self.config
    }

    /// Request that the in-flight (or next) run stop at the next
    /// checkpoint boundary. The run returns a `Cancelled` report with its
    /// progress persisted; re-invoking `squash_graph` resumes.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn take_cancel(&self) -> bool {
        self.cancelled.swap(false, Ordering::SeqCst)
    }

    async fn load_checkpoint(&self) -> SquashResult<Option<SquashCheckpoint>> {
        match self.checkpoints.load(&self.config.run_id()).await? {
            Some(bytes) => Ok(Some(SquashCheckpoint::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn save_checkpoint(&self, checkpoint: &mut SquashCheckpoint) -> SquashResult<()> {
        checkpoint.updated_at = Utc::now();
        self.checkpoints
            .save(&checkpoint.run_id, &checkpoint.encode()?)
            .await
    }

    /// Persist the `FAILED` state with the last good progress intact and
    /// hand the error back to the caller.
    async fn fail(&self, checkpoint: &mut SquashCheckpoint, err: SquashError) -> SquashError {
        error!(phase = %checkpoint.phase, error = %err, "unrecoverable collaborator failure");
        checkpoint.phase = Phase::Failed;
        if let Err(save_err) = self.save_checkpoint(checkpoint).await {
            error!(error = %save_err, "could not persist FAILED checkpoint");
        }
        err
    }

    async fn report_from(
        &self,
        checkpoint: &SquashCheckpoint,
        resumed_from: Phase,
        outcome: RunOutcome,
    ) -> SquashResult<SquashReport> {
        let graph_size = self.store.node_count(GraphView::Original).await?;
        let n_assigned = checkpoint.assignment.assignment.len();
        let ratio = if graph_size > 0 {
            n_assigned as f64 / graph_size as f64
        } else {
            0.0
        };
        Ok(SquashReport {
            outcome,
            run_id: checkpoint.run_id.clone(),
            resumed_from,
            phase: checkpoint.phase,
            n_cores: checkpoint.decomposition.cores.len(),
            graph_size,
            n_assigned,
            n_unassigned: graph_size.saturating_sub(n_assigned),
            assignment_ratio: ratio,
            n_core_edges: checkpoint.core_edges.len(),
            edges_scanned: checkpoint.aggregation.scanned,
            edges_dropped_unassigned: checkpoint.aggregation.dropped_unassigned,
            intra_group_edges: checkpoint.aggregation.intra_group,
        })
    }

    async fn cancelled_report(
        &self,
        checkpoint: &mut SquashCheckpoint,
        resumed_from: Phase,
    ) -> SquashResult<SquashReport> {
        warn!(phase = %checkpoint.phase, "run cancelled, checkpoint preserved");
        self.save_checkpoint(checkpoint).await?;
        self.report_from(checkpoint, resumed_from, RunOutcome::Cancelled)
            .await
    }

    /// Run (or resume) the full compression pipeline.
    pub async fn squash_graph(&self) -> SquashResult<SquashReport> {
        let _guard = self
            .run_lock
            .try_lock()
            .map_err(|_| SquashError::RunInProgress)?;

        let loaded = self.load_checkpoint().await?;
        let fresh = loaded.is_none();
        let mut checkpoint = match loaded {
            Some(cp) => {
                if cp.phase == Phase::Complete && cp.params == RunParams::from(&self.config) {
                    info!(run_id = %cp.run_id, "run already complete, returning prior result");
                    return self
                        .report_from(&cp, Phase::Complete, RunOutcome::Completed)
                        .await;
                }
                cp
            }
            None => SquashCheckpoint::new(&self.config),
        };
        let resumed_from = checkpoint.phase;
        if fresh {
            // A previous run with a different configuration may have left
            // deletions behind in the residual view.
            if let Err(err) = self.store.reset_residual().await {
                return Err(self.fail(&mut checkpoint, err).await);
            }
        } else {
            info!(
                run_id = %checkpoint.run_id,
                phase = %checkpoint.resume_phase(),
                "resuming from persisted checkpoint"
            );
        }

        let mut phase = checkpoint.resume_phase();

        if phase == Phase::Decomposing {
            checkpoint.phase = Phase::Decomposing;
            let decomposer = KCoreDecomposer::new(
                self.store.clone(),
                self.config.k,
                self.config.max_cores,
            )?;
            loop {
                if self.take_cancel() {
                    return self.cancelled_report(&mut checkpoint, resumed_from).await;
                }
                match decomposer.step(&mut checkpoint.decomposition).await {
                    Ok(StepOutcome::Continue) => self.save_checkpoint(&mut checkpoint).await?,
                    Ok(StepOutcome::Done) => {
                        info!(
                            n_cores = checkpoint.decomposition.cores.len(),
                            removed = checkpoint.decomposition.removed,
                            "decomposition complete"
                        );
                        self.save_checkpoint(&mut checkpoint).await?;
                        break;
                    }
                    Err(SquashError::EmptyGraph) => {
                        warn!("decomposition invoked on an empty graph, producing zero cores");
                        checkpoint.decomposition.exhausted = true;
                        checkpoint.assignment.initialized = true;
                        checkpoint.assignment.done = true;
                        checkpoint.aggregation.done = true;
                        break;
                    }
                    Err(err) => return Err(self.fail(&mut checkpoint, err).await),
                }
            }
            phase = Phase::Assigning;
        }

        if phase == Phase::Assigning && !checkpoint.assignment.done {
            checkpoint.phase = Phase::Assigning;
            let assigner = CoreAssigner::new(self.store.clone(), self.config.max_hops);
            if !checkpoint.assignment.initialized {
                let cores = checkpoint.decomposition.cores.clone();
                assigner.initialize(&cores, &mut checkpoint.assignment);
                self.save_checkpoint(&mut checkpoint).await?;
            }
            loop {
                if self.take_cancel() {
                    return self.cancelled_report(&mut checkpoint, resumed_from).await;
                }
                match assigner.step(&mut checkpoint.assignment).await {
                    Ok(StepOutcome::Continue) => self.save_checkpoint(&mut checkpoint).await?,
                    Ok(StepOutcome::Done) => {
                        info!(
                            n_assigned = checkpoint.assignment.assignment.len(),
                            "assignment complete"
                        );
                        self.save_checkpoint(&mut checkpoint).await?;
                        break;
                    }
                    Err(err) => return Err(self.fail(&mut checkpoint, err).await),
                }
            }
        }

        if !checkpoint.aggregation.done {
            checkpoint.phase = Phase::Aggregating;
            let aggregator = self.aggregator();
            loop {
                if self.take_cancel() {
                    return self.cancelled_report(&mut checkpoint, resumed_from).await;
                }
                match aggregator
                    .step(&checkpoint.assignment.assignment, &mut checkpoint.aggregation)
                    .await
                {
                    Ok(StepOutcome::Continue) => self.save_checkpoint(&mut checkpoint).await?,
                    Ok(StepOutcome::Done) => break,
                    Err(err) => return Err(self.fail(&mut checkpoint, err).await),
                }
            }
        }

        checkpoint.core_edges = self.aggregator().finalize(&checkpoint.aggregation);
        checkpoint.core_nodes = Self::build_core_nodes(&checkpoint);
        checkpoint.phase = Phase::Complete;
        self.save_checkpoint(&mut checkpoint).await?;
        info!(
            run_id = %checkpoint.run_id,
            n_cores = checkpoint.core_nodes.len(),
            n_core_edges = checkpoint.core_edges.len(),
            "compression complete"
        );
        self.report_from(&checkpoint, resumed_from, RunOutcome::Completed)
            .await
    }

    fn aggregator(&self) -> EdgeAggregator {
        EdgeAggregator::new(
            self.store.clone(),
            self.config.edge_batch_size,
            self.config.self_loop_policy,
            self.config.score_strategy,
        )
    }

    /// CORE node list in promotion order with represented-node counts.
    fn build_core_nodes(checkpoint: &SquashCheckpoint) -> Vec<CoreNode> {
        let counts = checkpoint.assignment.assignment.subnode_counts();
        checkpoint
            .decomposition
            .cores
            .iter()
            .map(|core| CoreNode {
                id: core.clone(),
                // Every CORE claims itself, so the count is always >= 1.
                n_subnodes: counts.get(core).copied().unwrap_or(1),
            })
            .collect()
    }

    async fn completed_checkpoint(&self) -> SquashResult<SquashCheckpoint> {
        let checkpoint = self.load_checkpoint().await?.ok_or(SquashError::NotReady {
            phase: Phase::NotStarted.to_string(),
        })?;
        if checkpoint.phase != Phase::Complete {
            return Err(SquashError::NotReady {
                phase: checkpoint.phase.to_string(),
            });
        }
        Ok(checkpoint)
    }

    /// Compressed node list `{id, n_subnodes}` in promotion order.
    ///
    /// Fails with [`SquashError::NotReady`] until a run reaches
    /// `COMPLETE`.
    pub async fn get_core_node_list(&self) -> SquashResult<Vec<CoreNode>> {
        Ok(self.completed_checkpoint().await?.core_nodes)
    }

    /// Compressed edge list `{source, target, weight, n_distinct, score}`
    /// ordered by `(source, target)`.
    ///
    /// Fails with [`SquashError::NotReady`] until a run reaches
    /// `COMPLETE`.
    pub async fn get_core_edge_list(&self) -> SquashResult<Vec<CoreEdge>> {
        Ok(self.completed_checkpoint().await?.core_edges)
    }

    /// Like [`get_core_edge_list`](Self::get_core_edge_list), keeping
    /// only edges with `score >= min_score`.
    pub async fn get_core_edge_list_with_min_score(
        &self,
        min_score: f64,
    ) -> SquashResult<Vec<CoreEdge>> {
        let mut edges = self.get_core_edge_list().await?;
        edges.retain(|edge| edge.score >= min_score);
        Ok(edges)
    }

    /// Wipe this configuration's checkpoint and restore the residual view
    /// so compression can be re-run from scratch.
    pub async fn reset(&self) -> SquashResult<()> {
        let _guard = self
            .run_lock
            .try_lock()
            .map_err(|_| SquashError::RunInProgress)?;
        self.checkpoints.delete(&self.config.run_id()).await?;
        self.store.reset_residual().await
    }
}
