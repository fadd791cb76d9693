//! Heads-up one-card poker.
//!
//! Both players ante, post their blinds, and receive one card from a
//! thirteen-rank single-suit deck; a single no-limit betting round follows
//! (fold, check/call, or raise to any amount from the minimum raise up to
//! the effective all-in). Showdown is automatic and the higher rank wins;
//! the deck has no duplicate ranks, so there are no ties. Payoffs are chip
//! deltas from the starting stack, which makes every terminal zero-sum.

use nashkit_engine::error::SolverError;
use nashkit_engine::node::{GameTree, InfoSet, NodeId};

use crate::builder::TreeBuilder;

/// Deck ranks, lowest first; one card per rank.
pub const RANKS: [char; 13] = [
    '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A',
];

/// Factory for heads-up one-card poker trees.
#[derive(Debug, Clone)]
pub struct OneCardPoker {
    ante: u32,
    blinds: [u32; 2],
    starting_stacks: [u32; 2],
}

/// One betting round in flight. Bets are chips committed beyond the ante.
#[derive(Clone)]
struct Round {
    stacks: [u32; 2],
    bets: [u32; 2],
    antes: u32,
    to_act: usize,
    min_delta: u32,
    acted: [bool; 2],
    history: String,
}

impl OneCardPoker {
    /// Create a factory with validated table parameters.
    ///
    /// Player 0 posts the small blind and acts first. Each starting stack
    /// must cover the ante plus the big blind, so posted bets are never
    /// short and every call can be paid in full.
    pub fn new(
        ante: u32,
        blinds: [u32; 2],
        starting_stacks: [u32; 2],
    ) -> Result<Self, SolverError> {
        if blinds[0] > blinds[1] {
            return Err(SolverError::InvalidArgument(format!(
                "small blind {} exceeds big blind {}",
                blinds[0], blinds[1]
            )));
        }
        for (player, &stack) in starting_stacks.iter().enumerate() {
            if stack < ante + blinds[1] {
                return Err(SolverError::InvalidArgument(format!(
                    "player {} stack {} cannot cover ante {} plus big blind {}",
                    player, stack, ante, blinds[1]
                )));
            }
        }
        Ok(OneCardPoker {
            ante,
            blinds,
            starting_stacks,
        })
    }

    /// Build the game tree: two sequential dealing chance nodes (thirteen
    /// ways for player 0's card, twelve for player 1's), then the betting
    /// subtree for each deal.
    pub fn build_tree(&self) -> Result<GameTree, SolverError> {
        let mut builder = TreeBuilder::new();
        let mut deals = Vec::with_capacity(RANKS.len());
        for c0 in 0..RANKS.len() {
            let mut replies = Vec::with_capacity(RANKS.len() - 1);
            for c1 in (0..RANKS.len()).filter(|&c| c != c0) {
                replies.push(self.betting(&mut builder, [c0, c1], self.open())?);
            }
            let weight = 1.0 / replies.len() as f64;
            let count = replies.len();
            deals.push(builder.chance(replies, vec![weight; count]));
        }
        let weight = 1.0 / RANKS.len() as f64;
        let root = builder.chance(deals, vec![weight; RANKS.len()]);
        builder.finish(root)
    }

    /// The round state right after antes and blinds are posted.
    fn open(&self) -> Round {
        Round {
            stacks: [
                self.starting_stacks[0] - self.ante - self.blinds[0],
                self.starting_stacks[1] - self.ante - self.blinds[1],
            ],
            bets: self.blinds,
            antes: 2 * self.ante,
            to_act: 0,
            min_delta: self.ante.max(self.blinds[1]),
            acted: [false, false],
            history: String::new(),
        }
    }

    /// Expand the betting subtree for `cards` from the given round state.
    ///
    /// Actions in declared order: fold (only when facing chips), check or
    /// call, then raises from the minimum raise up to the effective all-in.
    /// The round closes on a call or check once the opponent has already
    /// acted; the big blind keeps the option after a limp.
    fn betting(
        &self,
        builder: &mut TreeBuilder,
        cards: [usize; 2],
        round: Round,
    ) -> Result<NodeId, SolverError> {
        let me = round.to_act;
        let opp = 1 - me;
        let owed = round.bets[opp] - round.bets[me];

        let mut children = Vec::new();

        if owed > 0 {
            children.push(builder.terminal(self.pot_payoffs(&round, opp)));
        }

        {
            let mut next = round.clone();
            next.stacks[me] -= owed;
            next.bets[me] += owed;
            next.acted[me] = true;
            next.history.push(if owed > 0 { 'c' } else { 'x' });
            if round.acted[opp] {
                children.push(builder.terminal(self.showdown_payoffs(&next, cards)));
            } else {
                next.to_act = opp;
                children.push(self.betting(builder, cards, next)?);
            }
        }

        // Raise targets are capped at the effective stack, so the opponent
        // can always match in full.
        let max_to = (round.bets[me] + round.stacks[me]).min(round.bets[opp] + round.stacks[opp]);
        if max_to > round.bets[opp] {
            let lo = (round.bets[opp] + round.min_delta.max(1)).min(max_to);
            for target in lo..=max_to {
                let mut next = round.clone();
                next.stacks[me] -= target - round.bets[me];
                next.bets[me] = target;
                next.min_delta = round.min_delta.max(target - round.bets[opp]);
                next.acted[me] = true;
                next.to_act = opp;
                next.history.push('r');
                next.history.push_str(&target.to_string());
                children.push(self.betting(builder, cards, next)?);
            }
        }

        let action_count = children.len();
        builder.decision(
            children,
            InfoSet::new(
                me,
                action_count,
                format!("{}|{}", RANKS[cards[me]], round.history),
            ),
        )
    }

    /// Payoffs when `winner` takes the whole pot.
    fn pot_payoffs(&self, round: &Round, winner: usize) -> Vec<f64> {
        let pot = round.antes + round.bets[0] + round.bets[1];
        (0..2)
            .map(|player| {
                let chips = round.stacks[player] + if player == winner { pot } else { 0 };
                chips as f64 - self.starting_stacks[player] as f64
            })
            .collect()
    }

    fn showdown_payoffs(&self, round: &Round, cards: [usize; 2]) -> Vec<f64> {
        let winner = if cards[0] > cards[1] { 0 } else { 1 };
        self.pot_payoffs(round, winner)
    }
}
