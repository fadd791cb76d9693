//! Sequential rock-paper-scissors.
//!
//! Player 0 commits first; player 1 moves without observing the choice, so
//! player 1's three decision nodes share a single information set and the
//! game is strategically simultaneous. Win pays +1, loss -1, tie 0.

use nashkit_engine::error::SolverError;
use nashkit_engine::node::{GameTree, InfoSet};

use crate::builder::TreeBuilder;

/// Hands in declared order; each hand beats the one before it.
pub const HAND_COUNT: usize = 3;

/// Information set of the given player. The payload is just the player
/// index; neither player has observed anything when they act.
pub fn info_set(player: usize) -> InfoSet {
    InfoSet::new(player, HAND_COUNT, player.to_string())
}

/// Build the rock-paper-scissors tree: one decision per player, nine
/// terminals.
pub fn build_tree() -> Result<GameTree, SolverError> {
    let mut builder = TreeBuilder::new();
    let mut replies = Vec::with_capacity(HAND_COUNT);
    for first in 0..HAND_COUNT {
        let mut outcomes = Vec::with_capacity(HAND_COUNT);
        for second in 0..HAND_COUNT {
            outcomes.push(builder.terminal(payoffs(first, second)));
        }
        replies.push(builder.decision(outcomes, info_set(1))?);
    }
    let root = builder.decision(replies, info_set(0))?;
    builder.finish(root)
}

/// Payoffs for (player 0's hand, player 1's hand).
fn payoffs(first: usize, second: usize) -> Vec<f64> {
    match (HAND_COUNT + first - second) % HAND_COUNT {
        0 => vec![0.0, 0.0],
        1 => vec![1.0, -1.0],
        _ => vec![-1.0, 1.0],
    }
}
