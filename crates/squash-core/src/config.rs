//! Run configuration for graph compression.
//!
//! All parameters are validated up front: `validate()` rejects invalid
//! combinations before any collaborator call is made.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SquashError, SquashResult};

/// Policy for raw edges whose endpoints resolve to the same CORE.
///
/// The default is `Discard`: intra-group connectivity is already implied
/// by `n_subnodes`, so self-loops usually add noise to visualizations.
/// `Fold` keeps the weight as an explicit CORE self-loop instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelfLoopPolicy {
    /// Drop intra-group edges entirely (default).
    #[default]
    Discard,
    /// Fold intra-group edges into a CORE self-loop.
    Fold,
}

/// Swappable scoring formula for compressed edges.
///
/// Both formulas reward total aggregated weight and the number of distinct
/// raw edges behind it, so one heavy edge does not look the same as many
/// light ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoreStrategy {
    /// `weight * (1 + ln(n_distinct))` (default). Dampens the distinct
    /// count so very dense core pairs do not dominate the scale.
    #[default]
    LogDistinct,
    /// `weight * n_distinct`. Linear in both contributions.
    DistinctWeighted,
}

impl ScoreStrategy {
    /// Compute the score for an aggregated edge.
    pub fn score(&self, weight: f64, n_distinct: usize) -> f64 {
        match self {
            Self::LogDistinct => weight * (1.0 + (n_distinct as f64).ln()),
            Self::DistinctWeighted => weight * n_distinct as f64,
        }
    }
}

/// Bounded exponential backoff for transient collaborator failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts per store call, first try included.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay_ms: u64,
    /// Cap applied to the exponential delay.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_ms: 100,
            max_delay_ms: 5_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): base, 2x, 4x... capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        let delay = self
            .base_delay_ms
            .saturating_mul(factor)
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}

/// Parameters of a compression run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquashConfig {
    /// Degree threshold for peeling. Nodes with residual degree < k are
    /// removed before each promotion. Must be >= 1.
    pub k: u32,
    /// Upper bound on the number of CORE nodes produced. Must be >= 1.
    pub max_cores: usize,
    /// Maximum BFS distance at which a node may be claimed by a CORE.
    /// 0 assigns only the CORE nodes themselves.
    pub max_hops: u32,
    /// What to do with raw edges internal to one core group.
    pub self_loop_policy: SelfLoopPolicy,
    /// Scoring formula for compressed edges.
    pub score_strategy: ScoreStrategy,
    /// Retry budget for collaborator round-trips.
    pub retry: RetryPolicy,
    /// Edges fetched per scan round-trip during aggregation.
    pub edge_batch_size: usize,
}

impl Default for SquashConfig {
    fn default() -> Self {
        Self {
            k: 2,
            max_cores: 500,
            max_hops: 3,
            self_loop_policy: SelfLoopPolicy::default(),
            score_strategy: ScoreStrategy::default(),
            retry: RetryPolicy::default(),
            edge_batch_size: 4_096,
        }
    }
}

impl SquashConfig {
    /// Convenience constructor for the three primary parameters.
    pub fn new(k: u32, max_cores: usize, max_hops: u32) -> Self {
        Self {
            k,
            max_cores,
            max_hops,
            ..Self::default()
        }
    }

    /// Reject invalid parameters before any collaborator call.
    pub fn validate(&self) -> SquashResult<()> {
        if self.k == 0 {
            return Err(SquashError::configuration("k must be >= 1"));
        }
        if self.max_cores == 0 {
            return Err(SquashError::configuration("max_cores must be >= 1"));
        }
        if self.edge_batch_size == 0 {
            return Err(SquashError::configuration("edge_batch_size must be >= 1"));
        }
        if self.retry.max_attempts == 0 {
            return Err(SquashError::configuration("retry.max_attempts must be >= 1"));
        }
        Ok(())
    }

    /// Deterministic run identifier derived from the primary parameters,
    /// so different configurations against the same graph are tracked
    /// independently in the checkpoint store.
    pub fn run_id(&self) -> String {
        format!("squash-k{}-c{}-h{}", self.k, self.max_cores, self.max_hops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SquashConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_k_is_rejected() {
        let config = SquashConfig::new(0, 10, 2);
        assert!(matches!(
            config.validate(),
            Err(SquashError::Configuration { .. })
        ));
    }

    #[test]
    fn zero_max_cores_is_rejected() {
        let config = SquashConfig::new(2, 0, 2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn run_id_encodes_parameters() {
        let config = SquashConfig::new(2, 500, 3);
        assert_eq!(config.run_id(), "squash-k2-c500-h3");
    }

    #[test]
    fn backoff_is_exponential_and_capped() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 100,
            max_delay_ms: 300,
        };
        assert_eq!(policy.delay_for(1).as_millis(), 100);
        assert_eq!(policy.delay_for(2).as_millis(), 200);
        assert_eq!(policy.delay_for(3).as_millis(), 300);
        assert_eq!(policy.delay_for(10).as_millis(), 300);
    }

    #[test]
    fn log_distinct_rewards_both_weight_and_count() {
        let strategy = ScoreStrategy::LogDistinct;
        let single = strategy.score(10.0, 1);
        let many = strategy.score(10.0, 10);
        assert_eq!(single, 10.0);
        assert!(many > single);

        let linear = ScoreStrategy::DistinctWeighted;
        assert_eq!(linear.score(2.5, 4), 10.0);
    }
}
