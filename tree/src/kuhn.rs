//! Kuhn poker.
//!
//! Three ranks, one hole card each, ante 1, a single one-chip bet: player 0
//! checks or bets; after a check player 1 checks or bets; facing a bet a
//! player folds or calls. The card deal is modeled as sequential chance
//! nodes (three ways for player 0's card, two for player 1's), giving the
//! standard 58-node tree: 30 terminals, 4 chance nodes, 24 decision nodes,
//! 12 information sets.

use nashkit_engine::error::SolverError;
use nashkit_engine::node::{GameTree, InfoSet, NodeId};

use crate::builder::TreeBuilder;

/// Card ranks, lowest first.
pub const RANKS: [char; 3] = ['J', 'Q', 'K'];

/// Information set for a player holding `rank` after the public `history`
/// ("" = opening, "x" = facing a check, "b" = facing a bet, "xb" =
/// check-raise line).
pub fn info_set(player: usize, rank: char, history: &str) -> InfoSet {
    InfoSet::new(player, 2, format!("{}|{}", rank, history))
}

/// Build the Kuhn poker tree.
pub fn build_tree() -> Result<GameTree, SolverError> {
    let mut builder = TreeBuilder::new();
    let mut deals = Vec::with_capacity(RANKS.len());
    for c0 in 0..RANKS.len() {
        let mut replies = Vec::with_capacity(RANKS.len() - 1);
        for c1 in (0..RANKS.len()).filter(|&c| c != c0) {
            replies.push(betting(&mut builder, c0, c1, "")?);
        }
        deals.push(builder.chance(replies, vec![0.5, 0.5]));
    }
    let root = builder.chance(deals, vec![1.0 / 3.0; 3]);
    builder.finish(root)
}

/// Expand the betting subtree for the deal (c0, c1) after `history`.
fn betting(
    builder: &mut TreeBuilder,
    c0: usize,
    c1: usize,
    history: &str,
) -> Result<NodeId, SolverError> {
    match history {
        // Player 0 opens: check or bet.
        "" => {
            let check = betting(builder, c0, c1, "x")?;
            let bet = betting(builder, c0, c1, "b")?;
            builder.decision(vec![check, bet], info_set(0, RANKS[c0], ""))
        }
        // Player 1 after a check: check down or bet.
        "x" => {
            let check = builder.terminal(showdown(c0, c1, 1.0));
            let bet = betting(builder, c0, c1, "xb")?;
            builder.decision(vec![check, bet], info_set(1, RANKS[c1], "x"))
        }
        // Player 1 facing a bet: fold or call.
        "b" => {
            let fold = builder.terminal(vec![1.0, -1.0]);
            let call = builder.terminal(showdown(c0, c1, 2.0));
            builder.decision(vec![fold, call], info_set(1, RANKS[c1], "b"))
        }
        // Player 0 facing a check-raise: fold or call.
        "xb" => {
            let fold = builder.terminal(vec![-1.0, 1.0]);
            let call = builder.terminal(showdown(c0, c1, 2.0));
            builder.decision(vec![fold, call], info_set(0, RANKS[c0], "xb"))
        }
        _ => unreachable!("betting history {:?} cannot occur", history),
    }
}

/// Showdown payoffs when `stake` chips change hands.
fn showdown(c0: usize, c1: usize, stake: f64) -> Vec<f64> {
    if c0 > c1 {
        vec![stake, -stake]
    } else {
        vec![-stake, stake]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nashkit_engine::node::Node;

    #[test]
    fn test_standard_tree_census() {
        let tree = build_tree().unwrap();
        assert_eq!(tree.len(), 58);
        let terminals = tree.nodes().iter().filter(|n| n.is_terminal()).count();
        let chances = tree.nodes().iter().filter(|n| n.is_chance()).count();
        let decisions = tree.nodes().iter().filter(|n| n.is_decision()).count();
        assert_eq!(terminals, 30);
        assert_eq!(chances, 4);
        assert_eq!(decisions, 24);
        assert_eq!(tree.info_sets().len(), 12);
    }

    #[test]
    fn test_info_sets_split_by_card_and_history() {
        let tree = build_tree().unwrap();
        // Each player holds one of three cards in one of two situations.
        for rank in RANKS {
            for (player, history) in [(0, ""), (0, "xb"), (1, "x"), (1, "b")] {
                let set = info_set(player, rank, history);
                assert!(
                    tree.info_sets().contains(&set),
                    "missing info set {}",
                    set.payload_text()
                );
            }
        }
    }

    #[test]
    fn test_terminals_zero_sum() {
        let tree = build_tree().unwrap();
        for node in tree.nodes() {
            if let Node::Terminal { payoffs } = node {
                assert!((payoffs[0] + payoffs[1]).abs() < 1e-12);
                assert!(payoffs[0].abs() <= 2.0);
            }
        }
    }

    #[test]
    fn test_higher_card_wins_showdown() {
        assert_eq!(showdown(2, 0, 2.0), vec![2.0, -2.0]);
        assert_eq!(showdown(0, 1, 1.0), vec![-1.0, 1.0]);
    }
}
