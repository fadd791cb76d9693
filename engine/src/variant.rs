//! CFR variant policies: strategy derivation and end-of-iteration discounts.
//!
//! All three variants share the traversal in [`crate::cfr`]; they differ only
//! in how the current strategy is read off the accumulated regrets and in how
//! regrets and averages are discounted when an iteration is collected.

use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::state::{uniform, InfoSetState};

/// Default DCFR regret discount exponent for positive regrets.
pub const DCFR_ALPHA: f64 = 1.5;
/// Default DCFR regret discount exponent for non-positive regrets.
pub const DCFR_BETA: f64 = 0.0;
/// Default DCFR averaging discount exponent.
pub const DCFR_GAMMA: f64 = 2.0;

/// The regret-minimization rule driving the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Variant {
    /// Vanilla counterfactual regret minimization.
    Vanilla,
    /// CFR+: regrets floored at zero after every update, with averaging
    /// weighted toward later iterations.
    CfrPlus,
    /// Discounted CFR: positive and non-positive regrets decay at different
    /// rates, and the averages decay polynomially.
    Discounted {
        /// Exponent for the positive-regret multiplier `t^α / (t^α + 1)`.
        alpha: f64,
        /// Exponent for the non-positive-regret multiplier `t^β / (t^β + 1)`.
        beta: f64,
        /// Exponent for the averaging multiplier `(t / (t + 1))^γ`.
        gamma: f64,
    },
}

impl Variant {
    /// Discounted CFR with validated parameters.
    ///
    /// Fails with [`SolverError::InvalidArgument`] when any exponent is not
    /// finite. The discount multipliers themselves stay finite because the
    /// iteration counter is 1-based.
    pub fn discounted(alpha: f64, beta: f64, gamma: f64) -> Result<Self, SolverError> {
        if alpha.is_finite() && beta.is_finite() && gamma.is_finite() {
            Ok(Variant::Discounted { alpha, beta, gamma })
        } else {
            Err(SolverError::InvalidArgument(format!(
                "DCFR exponents must be finite, got alpha={}, beta={}, gamma={}",
                alpha, beta, gamma
            )))
        }
    }

    /// Discounted CFR with the standard (1.5, 0, 2) parameters.
    pub fn discounted_default() -> Self {
        Variant::Discounted {
            alpha: DCFR_ALPHA,
            beta: DCFR_BETA,
            gamma: DCFR_GAMMA,
        }
    }

    /// Current mixed strategy for an information set with the given regrets.
    ///
    /// Regret matching: positive regrets normalized to a distribution,
    /// uniform when no action has positive regret. CFR+ maintains its regrets
    /// non-negative, so it normalizes them directly.
    pub(crate) fn current_strategy(&self, regrets: &[f64]) -> Vec<f64> {
        let mut strategy: Vec<f64> = match self {
            Variant::CfrPlus => regrets.to_vec(),
            Variant::Vanilla | Variant::Discounted { .. } => {
                regrets.iter().map(|r| r.max(0.0)).collect()
            }
        };
        let total: f64 = strategy.iter().sum();
        if total > 0.0 {
            for s in strategy.iter_mut() {
                *s /= total;
            }
            strategy
        } else {
            uniform(regrets.len())
        }
    }

    /// Fold one traversal's accumulators into the running totals and clear
    /// them. `t` is the 1-based iteration counter.
    ///
    /// The common part adds the reach-weighted strategy to the average and
    /// the counterfactual regrets to the regret vector; the variant overlay
    /// then floors or discounts in place.
    pub(crate) fn collect(&self, state: &mut InfoSetState, t: u64) {
        let strategy = self.current_strategy(&state.regrets);

        for (sum, s) in state.strategy_sum.iter_mut().zip(&strategy) {
            *sum += state.iter_weight * s;
        }
        state.weight_sum += state.iter_weight;

        let mean: f64 = state
            .iter_counterfactuals
            .iter()
            .zip(&strategy)
            .map(|(u, s)| u * s)
            .sum();
        for (regret, u) in state.regrets.iter_mut().zip(&state.iter_counterfactuals) {
            *regret += u - mean;
        }

        let t = t as f64;
        match *self {
            Variant::Vanilla => {}
            Variant::CfrPlus => {
                for regret in state.regrets.iter_mut() {
                    *regret = regret.max(0.0);
                }
                let m = t / (t + 1.0);
                for sum in state.strategy_sum.iter_mut() {
                    *sum *= m;
                }
                state.weight_sum *= m;
            }
            Variant::Discounted { alpha, beta, gamma } => {
                let pos = t.powf(alpha) / (t.powf(alpha) + 1.0);
                let neg = t.powf(beta) / (t.powf(beta) + 1.0);
                for regret in state.regrets.iter_mut() {
                    *regret *= if *regret > 0.0 { pos } else { neg };
                }
                let m = (t / (t + 1.0)).powf(gamma);
                for sum in state.strategy_sum.iter_mut() {
                    *sum *= m;
                }
                state.weight_sum *= m;
            }
        }

        state.iter_weight = 0.0;
        state.iter_counterfactuals.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regret_matching_uniform_initial() {
        let strategy = Variant::Vanilla.current_strategy(&[0.0, 0.0]);
        assert!((strategy[0] - 0.5).abs() < 1e-10);
        assert!((strategy[1] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_regret_matching_proportional() {
        let strategy = Variant::Vanilla.current_strategy(&[2.0, 1.0]);
        assert!((strategy[0] - 2.0 / 3.0).abs() < 1e-10);
        assert!((strategy[1] - 1.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_negative_regrets_clipped() {
        let strategy = Variant::Vanilla.current_strategy(&[1.0, -5.0, 1.0]);
        assert!((strategy[0] - 0.5).abs() < 1e-10);
        assert!(strategy[1] == 0.0);
        assert!((strategy[2] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_strategy_sums_to_one() {
        let strategy = Variant::Vanilla.current_strategy(&[1.0, 0.5, 0.0]);
        let sum: f64 = strategy.iter().sum();
        assert!((sum - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cfr_plus_floor_applied_after_update() {
        let mut state = InfoSetState::new(2);
        state.regrets = vec![0.5, -1.0];
        state.iter_weight = 1.0;
        state.iter_counterfactuals = vec![-2.0, 3.0];
        // mean = -2.0 * 0.5... strategy from regrets [0.5, -1.0] under CFR+
        // normalizes the raw values: sum is -0.5, so uniform applies.
        Variant::CfrPlus.collect(&mut state, 1);
        // regret updates: u - u.sigma with sigma uniform, mean = 0.5.
        // [0.5 - 2.5, -1.0 + 2.5] -> [-2.0, 1.5] -> floored [0.0, 1.5]
        assert!((state.regrets[0] - 0.0).abs() < 1e-10);
        assert!((state.regrets[1] - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_cfr_plus_averaging_discount() {
        let mut state = InfoSetState::new(2);
        state.iter_weight = 1.0;
        Variant::CfrPlus.collect(&mut state, 1);
        // weight_sum = 1.0 scaled by 1/2.
        assert!((state.weight_sum - 0.5).abs() < 1e-10);
        let sum: f64 = state.strategy_sum.iter().sum();
        assert!((sum - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_dcfr_discounts_by_sign() {
        let mut state = InfoSetState::new(2);
        state.regrets = vec![2.0, -2.0];
        // No iteration contribution: only the overlay applies.
        Variant::discounted_default().collect(&mut state, 1);
        // alpha = 1.5: 1/(1+1) = 0.5; beta = 0: 1/(1+1) = 0.5 at t=1.
        assert!((state.regrets[0] - 1.0).abs() < 1e-10);
        assert!((state.regrets[1] + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_dcfr_discounts_diverge_later() {
        let mut state = InfoSetState::new(2);
        state.regrets = vec![1.0, -1.0];
        Variant::discounted_default().collect(&mut state, 4);
        // t = 4: positive multiplier 8/9, non-positive multiplier 1/2.
        assert!((state.regrets[0] - 8.0 / 9.0).abs() < 1e-10);
        assert!((state.regrets[1] + 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_dcfr_rejects_non_finite_exponents() {
        assert!(Variant::discounted(f64::NAN, 0.0, 2.0).is_err());
        assert!(Variant::discounted(1.5, f64::INFINITY, 2.0).is_err());
        assert!(Variant::discounted(1.5, 0.0, 2.0).is_ok());
    }

    #[test]
    fn test_collect_clears_iteration_accumulators() {
        let mut state = InfoSetState::new(3);
        state.iter_weight = 0.7;
        state.iter_counterfactuals = vec![1.0, 2.0, 3.0];
        Variant::Vanilla.collect(&mut state, 1);
        assert_eq!(state.iter_weight, 0.0);
        assert_eq!(state.iter_counterfactuals, vec![0.0; 3]);
    }

    #[test]
    fn test_single_action_regret_stays_zero() {
        let mut state = InfoSetState::new(1);
        state.iter_weight = 1.0;
        state.iter_counterfactuals = vec![5.0];
        Variant::Vanilla.collect(&mut state, 1);
        // u - u.sigma vanishes when sigma is the point distribution.
        assert!((state.regrets[0]).abs() < 1e-12);
    }
}
