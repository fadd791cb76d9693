//! Mutable numeric state attached to each information set.

use serde::{Deserialize, Serialize};

/// Accumulators for one information set.
///
/// `regrets`, `strategy_sum`, and `weight_sum` persist across iterations and
/// define the current and average strategies. `iter_weight` and
/// `iter_counterfactuals` gather contributions from every decision node of
/// the set during a single traversal and are folded into the persistent
/// accumulators (then cleared) by the end-of-iteration collect.
///
/// One instance exists per distinct information set, created at solver
/// construction and mutated only by `step()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoSetState {
    pub(crate) regrets: Vec<f64>,
    pub(crate) strategy_sum: Vec<f64>,
    pub(crate) weight_sum: f64,
    pub(crate) iter_weight: f64,
    pub(crate) iter_counterfactuals: Vec<f64>,
}

impl InfoSetState {
    pub(crate) fn new(action_count: usize) -> Self {
        InfoSetState {
            regrets: vec![0.0; action_count],
            strategy_sum: vec![0.0; action_count],
            weight_sum: 0.0,
            iter_weight: 0.0,
            iter_counterfactuals: vec![0.0; action_count],
        }
    }

    /// Number of actions at this information set.
    pub fn action_count(&self) -> usize {
        self.regrets.len()
    }

    /// Cumulative regret per action.
    pub fn regrets(&self) -> &[f64] {
        &self.regrets
    }

    /// Reach-weighted average of the strategies played so far.
    ///
    /// Uniform until the first collect with a nonzero reach weight; safe at
    /// deep paths where every reach weight underflowed to zero.
    pub fn average_strategy(&self) -> Vec<f64> {
        if self.weight_sum > 0.0 {
            self.strategy_sum
                .iter()
                .map(|s| s / self.weight_sum)
                .collect()
        } else {
            uniform(self.action_count())
        }
    }
}

/// The uniform distribution over `n` actions.
pub(crate) fn uniform(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}
