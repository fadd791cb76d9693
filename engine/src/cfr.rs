//! CFR tree traversal and the solver driver.
//!
//! The traversal is implemented as a pure free function (`traverse`) that
//! collects per-info-set accumulator updates rather than mutating state
//! mid-walk. This design enables Rayon-parallel processing at chance nodes:
//! since only shared references (&GameTree, &[InfoSetState]) are needed
//! during traversal, independent subtrees can run concurrently without
//! locks. Child results and collected updates are combined in declared
//! child order, so every iteration is deterministic.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::node::{GameTree, InfoSet, InfoSetId, Node, NodeId};
use crate::state::InfoSetState;
use crate::variant::Variant;

/// Reach weight and counterfactual values gathered at one decision node
/// during a traversal, applied to the owning info set after the walk.
#[derive(Clone)]
struct Accumulation {
    info_set: InfoSetId,
    /// The acting player's own reach at node entry.
    weight: f64,
    /// Per action: counterfactual reach times the child's value for the
    /// acting player.
    counterfactuals: Vec<f64>,
}

/// Pure CFR traversal from `node`. Returns `(values, accumulations)` where
/// `values` is the expected payoff vector (one entry per player) under the
/// current strategy profile.
///
/// `nature_reach` is the product of chance probabilities along the path from
/// the root; `player_reach[p]` is the product of action probabilities player
/// `p` contributed along it.
fn traverse(
    tree: &GameTree,
    states: &[InfoSetState],
    variant: &Variant,
    node: NodeId,
    nature_reach: f64,
    player_reach: &[f64],
) -> (Vec<f64>, Vec<Accumulation>) {
    match tree.get(node).expect("invalid node id") {
        Node::Terminal { payoffs } => (payoffs.clone(), Vec::new()),

        Node::Chance {
            children,
            probabilities,
        } => {
            // Chance subtrees are disjoint and only need shared refs, so
            // Rayon's work-stealing scheduler can fan out safely.
            let results: Vec<(Vec<f64>, Vec<Accumulation>)> = children
                .par_iter()
                .zip(probabilities.par_iter())
                .map(|(&child, &p)| {
                    traverse(tree, states, variant, child, nature_reach * p, player_reach)
                })
                .collect();

            let mut values = vec![0.0; tree.player_count()];
            let mut accumulations = Vec::new();
            for ((child_values, child_accs), &p) in results.into_iter().zip(probabilities) {
                for (value, child_value) in values.iter_mut().zip(&child_values) {
                    *value += p * child_value;
                }
                accumulations.extend(child_accs);
            }
            (values, accumulations)
        }

        Node::Decision { children, info_set } => {
            let set = tree.info_set(*info_set).expect("invalid info set id");
            let player = set.player;
            let strategy = variant.current_strategy(states[*info_set as usize].regrets());

            let mut child_values = Vec::with_capacity(children.len());
            let mut accumulations = Vec::new();
            for (&child, &p) in children.iter().zip(&strategy) {
                let mut reach = player_reach.to_vec();
                reach[player] *= p;
                let (values, child_accs) =
                    traverse(tree, states, variant, child, nature_reach, &reach);
                accumulations.extend(child_accs);
                child_values.push(values);
            }

            // Reach weights at node entry: the acting player's own
            // contribution, and the counterfactual product of everyone else's.
            let own_reach = player_reach[player];
            let cf_reach: f64 = nature_reach
                * player_reach
                    .iter()
                    .enumerate()
                    .filter(|&(q, _)| q != player)
                    .map(|(_, r)| r)
                    .product::<f64>();

            accumulations.push(Accumulation {
                info_set: *info_set,
                weight: own_reach,
                counterfactuals: child_values
                    .iter()
                    .map(|values| cf_reach * values[player])
                    .collect(),
            });

            let mut values = vec![0.0; tree.player_count()];
            for (child, &p) in child_values.iter().zip(&strategy) {
                for (value, child_value) in values.iter_mut().zip(child) {
                    *value += p * child_value;
                }
            }
            (values, accumulations)
        }
    }
}

/// Equilibrium solver: iterated self-play over a fixed game tree.
///
/// Owns the per-info-set state map; the tree stays immutable throughout.
/// Each [`Solver::step`] call runs one full-tree traversal followed by the
/// variant's collect step. The average strategy read back by
/// [`Solver::query`] is what converges toward equilibrium.
#[derive(Debug, Serialize, Deserialize)]
pub struct Solver {
    tree: GameTree,
    variant: Variant,
    states: Vec<InfoSetState>,
    index: HashMap<InfoSet, InfoSetId>,
    iterations: u64,
}

impl Solver {
    /// Create a solver for the given tree.
    ///
    /// Re-validates the tree's structural invariants and allocates one state
    /// per registered information set. The iteration counter starts at zero.
    pub fn new(tree: GameTree, variant: Variant) -> Result<Self, SolverError> {
        tree.validate()?;
        let states = tree
            .info_sets()
            .iter()
            .map(|set| InfoSetState::new(set.action_count))
            .collect();
        let index = tree
            .info_sets()
            .iter()
            .enumerate()
            .map(|(id, set)| (set.clone(), id as InfoSetId))
            .collect();
        Ok(Solver {
            tree,
            variant,
            states,
            index,
            iterations: 0,
        })
    }

    /// Run one CFR iteration.
    ///
    /// Increments the iteration counter, traverses the whole tree once,
    /// applies the collected accumulations, and runs the variant's collect on
    /// every information set. Returns the root expected-payoff vector under
    /// the pre-collect strategy profile, for logging and convergence
    /// monitoring.
    pub fn step(&mut self) -> Vec<f64> {
        self.iterations += 1;
        let root_reach = vec![1.0; self.tree.player_count()];
        let (values, accumulations) = traverse(
            &self.tree,
            &self.states,
            &self.variant,
            self.tree.root(),
            1.0,
            &root_reach,
        );

        for acc in accumulations {
            let state = &mut self.states[acc.info_set as usize];
            state.iter_weight += acc.weight;
            for (total, cf) in state
                .iter_counterfactuals
                .iter_mut()
                .zip(&acc.counterfactuals)
            {
                *total += cf;
            }
        }
        for state in self.states.iter_mut() {
            self.variant.collect(state, self.iterations);
        }

        log::debug!("iteration {}: root values {:?}", self.iterations, values);
        values
    }

    /// Average strategy at an information set.
    ///
    /// Fails with [`SolverError::UnknownInformationSet`] when the set is not
    /// registered in this solver's tree.
    pub fn query(&self, info_set: &InfoSet) -> Result<Vec<f64>, SolverError> {
        let &id = self
            .index
            .get(info_set)
            .ok_or(SolverError::UnknownInformationSet)?;
        Ok(self.states[id as usize].average_strategy())
    }

    /// Probability vector the average policy assigns at a node: empty at a
    /// terminal, the chance distribution at a chance node, the info set's
    /// average strategy at a decision node.
    pub fn query_node(&self, node: NodeId) -> Result<Vec<f64>, SolverError> {
        match self.tree.get(node) {
            None => Err(SolverError::InvalidArgument(format!(
                "node id {} is out of bounds",
                node
            ))),
            Some(Node::Terminal { .. }) => Ok(Vec::new()),
            Some(Node::Chance { probabilities, .. }) => Ok(probabilities.clone()),
            Some(Node::Decision { info_set, .. }) => {
                Ok(self.states[*info_set as usize].average_strategy())
            }
        }
    }

    /// Expected payoff vector at the root under the average strategy.
    pub fn expected_value(&self) -> Vec<f64> {
        self.expected_values_from(self.tree.root())
    }

    /// Expected payoff vector at an arbitrary node under the average
    /// strategy. Touches no solver state.
    pub fn expected_value_at(&self, node: NodeId) -> Result<Vec<f64>, SolverError> {
        if self.tree.get(node).is_none() {
            return Err(SolverError::InvalidArgument(format!(
                "node id {} is out of bounds",
                node
            )));
        }
        Ok(self.expected_values_from(node))
    }

    fn expected_values_from(&self, node: NodeId) -> Vec<f64> {
        match self.tree.get(node).expect("invalid node id") {
            Node::Terminal { payoffs } => payoffs.clone(),
            Node::Chance {
                children,
                probabilities,
            } => self.mix_children(children, probabilities),
            Node::Decision { children, info_set } => {
                let average = self.states[*info_set as usize].average_strategy();
                self.mix_children(children, &average)
            }
        }
    }

    fn mix_children(&self, children: &[NodeId], weights: &[f64]) -> Vec<f64> {
        let mut values = vec![0.0; self.tree.player_count()];
        for (&child, &w) in children.iter().zip(weights) {
            // Skip zero-weight branches; their subtrees cannot contribute.
            if w == 0.0 {
                continue;
            }
            let child_values = self.expected_values_from(child);
            for (value, child_value) in values.iter_mut().zip(&child_values) {
                *value += w * child_value;
            }
        }
        values
    }

    /// Number of completed iterations.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// The tree being solved.
    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    /// The variant driving regret updates.
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// State of one information set, by the same identity `query` uses.
    pub fn info_set_state(&self, info_set: &InfoSet) -> Result<&InfoSetState, SolverError> {
        let &id = self
            .index
            .get(info_set)
            .ok_or(SolverError::UnknownInformationSet)?;
        Ok(&self.states[id as usize])
    }

    /// All per-info-set states, indexed like the tree's registry.
    pub fn info_set_states(&self) -> &[InfoSetState] {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_tree::{build_test_tree, facing_bet_info_set, holding_info_set};

    fn terminal_tree(payoffs: Vec<f64>) -> GameTree {
        GameTree::from_parts(vec![Node::Terminal { payoffs }], vec![], 0).unwrap()
    }

    #[test]
    fn test_step_on_terminal_tree_returns_payoffs() {
        let tree = terminal_tree(vec![7.0, -3.0, 0.0]);
        let mut solver = Solver::new(tree, Variant::Vanilla).unwrap();
        assert_eq!(solver.step(), vec![7.0, -3.0, 0.0]);
        assert_eq!(solver.expected_value(), vec![7.0, -3.0, 0.0]);
        assert_eq!(solver.iterations(), 1);
    }

    #[test]
    fn test_query_unknown_info_set_errors() {
        let tree = terminal_tree(vec![1.0]);
        let solver = Solver::new(tree, Variant::Vanilla).unwrap();
        let unknown = InfoSet::new(0, 2, "nowhere");
        assert!(matches!(
            solver.query(&unknown),
            Err(SolverError::UnknownInformationSet)
        ));
    }

    #[test]
    fn test_initial_strategies_uniform() {
        let tree = build_test_tree();
        let solver = Solver::new(tree, Variant::Vanilla).unwrap();
        for set in solver.tree().info_sets().to_vec() {
            let strategy = solver.query(&set).unwrap();
            for p in &strategy {
                assert!((p - 1.0 / set.action_count as f64).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_query_normalized_after_steps() {
        let tree = build_test_tree();
        let mut solver = Solver::new(tree, Variant::Vanilla).unwrap();
        for _ in 0..100 {
            solver.step();
        }
        for set in solver.tree().info_sets().to_vec() {
            let strategy = solver.query(&set).unwrap();
            let sum: f64 = strategy.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
            assert!(strategy.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
    }

    #[test]
    fn test_query_idempotent() {
        let tree = build_test_tree();
        let mut solver = Solver::new(tree, Variant::Vanilla).unwrap();
        for _ in 0..10 {
            solver.step();
        }
        let set = facing_bet_info_set();
        let first = solver.query(&set).unwrap();
        let second = solver.query(&set).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let run = || {
            let mut solver = Solver::new(build_test_tree(), Variant::Vanilla).unwrap();
            for _ in 0..50 {
                solver.step();
            }
            solver.query(&facing_bet_info_set()).unwrap()
        };
        let a = run();
        let b = run();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_query_node_dispatch() {
        let tree = build_test_tree();
        let mut solver = Solver::new(tree, Variant::Vanilla).unwrap();
        solver.step();
        // Root is the dealing chance node.
        assert_eq!(solver.query_node(0).unwrap(), vec![0.5, 0.5]);
        // Node 3 is the check-down terminal.
        assert_eq!(solver.query_node(3).unwrap(), Vec::<f64>::new());
        // Node 1 is a decision node; its vector matches `query`.
        let by_node = solver.query_node(1).unwrap();
        let by_set = solver.query(&holding_info_set(true)).unwrap();
        assert_eq!(by_node, by_set);
        assert!(solver.query_node(99).is_err());
    }

    #[test]
    fn test_expected_value_zero_sum_every_iteration() {
        let tree = build_test_tree();
        let mut solver = Solver::new(tree, Variant::Vanilla).unwrap();
        for _ in 0..25 {
            let values = solver.step();
            assert!((values[0] + values[1]).abs() < 1e-9);
            let ev = solver.expected_value();
            assert!((ev[0] + ev[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bluffing_game_converges() {
        // The test tree's equilibrium: bet the low card 1/3 of the time,
        // call a bet 2/3 of the time.
        let tree = build_test_tree();
        let mut solver = Solver::new(tree, Variant::CfrPlus).unwrap();
        for _ in 0..10_000 {
            solver.step();
        }
        let bluff = solver.query(&holding_info_set(false)).unwrap();
        assert!((bluff[1] - 1.0 / 3.0).abs() < 0.02, "bluff rate {}", bluff[1]);
        let call = solver.query(&facing_bet_info_set()).unwrap();
        assert!((call[1] - 2.0 / 3.0).abs() < 0.02, "call rate {}", call[1]);
        // High card always bets at equilibrium.
        let value = solver.query(&holding_info_set(true)).unwrap();
        assert!(value[1] > 0.95, "high-card bet rate {}", value[1]);
    }

    #[test]
    fn test_cfr_plus_regrets_stay_non_negative() {
        let tree = build_test_tree();
        let mut solver = Solver::new(tree, Variant::CfrPlus).unwrap();
        for _ in 0..50 {
            solver.step();
            for state in solver.info_set_states() {
                assert!(state.regrets().iter().all(|&r| r >= 0.0));
            }
        }
    }

    #[test]
    fn test_variants_share_traversal() {
        // One step of vanilla and DCFR start from identical regrets, so the
        // first traversal's root values agree bit-for-bit.
        let mut vanilla = Solver::new(build_test_tree(), Variant::Vanilla).unwrap();
        let mut dcfr = Solver::new(build_test_tree(), Variant::discounted_default()).unwrap();
        let a = vanilla.step();
        let b = dcfr.step();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_expected_value_at_subtree() {
        let tree = build_test_tree();
        let solver = Solver::new(tree, Variant::Vanilla).unwrap();
        // Node 3 is the high-card check-down terminal.
        assert_eq!(solver.expected_value_at(3).unwrap(), vec![1.0, -1.0]);
        assert!(solver.expected_value_at(99).is_err());
    }
}
