//! Hardcoded 11-node tree for solver validation and benchmarks.
//!
//! A minimal one-card bluffing game: both players ante 1, chance deals
//! player 0 a High or Low card, player 0 checks or bets 1, and player 1
//! folds or calls. Player 1 cannot see the card, so both of their nodes
//! share one information set.
//!
//! Tree structure:
//!   0:  Chance          [High → 1 (p=1/2), Low → 2 (p=1/2)]
//!   1:  Decision P0     High: [Check → 3, Bet → 4]
//!   2:  Decision P0     Low:  [Check → 5, Bet → 6]
//!   3:  Terminal        High checked down            ( 1, -1)
//!   4:  Decision P1     facing bet: [Fold → 7, Call → 8]
//!   5:  Terminal        Low checked down             (-1,  1)
//!   6:  Decision P1     facing bet: [Fold → 9, Call → 10]
//!   7:  Terminal        P1 folds to High             ( 1, -1)
//!   8:  Terminal        P1 calls High                ( 2, -2)
//!   9:  Terminal        P1 folds to Low              ( 1, -1)
//!   10: Terminal        P1 calls Low                 (-2,  2)
//!
//! Equilibrium: player 0 always bets High and bets Low with probability
//! 1/3; player 1 calls with probability 2/3. Game value 1/3 to player 0.

use crate::node::{GameTree, InfoSet, Node};

/// Player 0's information set when holding the high or low card.
pub fn holding_info_set(high: bool) -> InfoSet {
    InfoSet::new(0, 2, if high { "high" } else { "low" })
}

/// Player 1's single information set when facing a bet.
pub fn facing_bet_info_set() -> InfoSet {
    InfoSet::new(1, 2, "facing-bet")
}

/// Build the 11-node bluffing-game tree.
/// Nodes are pushed in ID order so that `tree.get(id)` matches the layout
/// above.
pub fn build_test_tree() -> GameTree {
    let nodes = vec![
        // Node 0: chance deals player 0's card.
        Node::Chance {
            children: vec![1, 2],
            probabilities: vec![0.5, 0.5],
        },
        // Node 1: player 0 holds High.
        Node::Decision {
            children: vec![3, 4],
            info_set: 0,
        },
        // Node 2: player 0 holds Low.
        Node::Decision {
            children: vec![5, 6],
            info_set: 1,
        },
        // Node 3: High checked down.
        Node::Terminal {
            payoffs: vec![1.0, -1.0],
        },
        // Node 4: player 1 faces a bet holding High's line.
        Node::Decision {
            children: vec![7, 8],
            info_set: 2,
        },
        // Node 5: Low checked down.
        Node::Terminal {
            payoffs: vec![-1.0, 1.0],
        },
        // Node 6: player 1 faces a bet on the Low line.
        Node::Decision {
            children: vec![9, 10],
            info_set: 2,
        },
        // Node 7: fold to High.
        Node::Terminal {
            payoffs: vec![1.0, -1.0],
        },
        // Node 8: call against High.
        Node::Terminal {
            payoffs: vec![2.0, -2.0],
        },
        // Node 9: fold to Low.
        Node::Terminal {
            payoffs: vec![1.0, -1.0],
        },
        // Node 10: call against Low.
        Node::Terminal {
            payoffs: vec![-2.0, 2.0],
        },
    ];
    let info_sets = vec![
        holding_info_set(true),
        holding_info_set(false),
        facing_bet_info_set(),
    ];
    GameTree::from_parts(nodes, info_sets, 0).expect("test tree is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_node_count() {
        let tree = build_test_tree();
        assert_eq!(tree.len(), 11);
        assert_eq!(tree.player_count(), 2);
    }

    #[test]
    fn test_root_is_chance() {
        let tree = build_test_tree();
        match tree.get(0).unwrap() {
            Node::Chance {
                children,
                probabilities,
            } => {
                assert_eq!(children, &[1u32, 2u32]);
                assert_eq!(probabilities, &[0.5, 0.5]);
            }
            _ => panic!("node 0 should be a chance node"),
        }
    }

    #[test]
    fn test_facing_bet_nodes_share_info_set() {
        let tree = build_test_tree();
        assert_eq!(tree.get(4).unwrap().info_set(), Some(2));
        assert_eq!(tree.get(6).unwrap().info_set(), Some(2));
        assert_eq!(tree.info_sets().len(), 3);
    }

    #[test]
    fn test_terminal_payoffs_zero_sum() {
        let tree = build_test_tree();
        for node in tree.nodes() {
            if let Node::Terminal { payoffs } = node {
                let sum: f64 = payoffs.iter().sum();
                assert!(sum.abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_all_children_valid() {
        let tree = build_test_tree();
        for node in tree.nodes() {
            for &child in node.children() {
                assert!(tree.get(child).is_some(), "child {} out of bounds", child);
            }
        }
    }
}
