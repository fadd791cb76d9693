//! Full tic-tac-toe game tree.
//!
//! Every legal move sequence becomes a path in the tree; information sets
//! are keyed by the resulting board position, so move orders that transpose
//! into the same position share one set. The complete tree holds 549,946
//! nodes over 4,520 information sets; tree size dominates memory, while
//! per-set state stays O(action count).

use nashkit_engine::error::SolverError;
use nashkit_engine::node::{GameTree, InfoSet, NodeId};

use crate::builder::TreeBuilder;

/// The eight winning lines.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A board: 0 = empty, 1 = player 0 (X), 2 = player 1 (O).
#[derive(Clone, Copy)]
struct Board {
    cells: [u8; 9],
}

impl Board {
    fn empty() -> Self {
        Board { cells: [0; 9] }
    }

    fn mark(mut self, cell: usize, player: usize) -> Self {
        self.cells[cell] = player as u8 + 1;
        self
    }

    fn winner(&self) -> Option<usize> {
        LINES.iter().find_map(|line| {
            let mark = self.cells[line[0]];
            if mark != 0 && line.iter().all(|&c| self.cells[c] == mark) {
                Some(mark as usize - 1)
            } else {
                None
            }
        })
    }

    fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != 0)
    }

    /// Payoffs once the game is over, `None` while a move is pending.
    fn payoffs(&self) -> Option<Vec<f64>> {
        match self.winner() {
            Some(0) => Some(vec![1.0, -1.0]),
            Some(_) => Some(vec![-1.0, 1.0]),
            None if self.is_full() => Some(vec![0.0, 0.0]),
            None => None,
        }
    }

    /// Position rendered as nine characters, the info-set payload.
    fn key(&self) -> String {
        self.cells
            .iter()
            .map(|&c| match c {
                1 => 'X',
                2 => 'O',
                _ => '.',
            })
            .collect()
    }
}

/// Player 0's opening information set (the empty board).
pub fn root_info_set() -> InfoSet {
    InfoSet::new(0, 9, Board::empty().key())
}

/// Build the full tic-tac-toe tree.
pub fn build_tree() -> Result<GameTree, SolverError> {
    let mut builder = TreeBuilder::new();
    let root = expand(&mut builder, Board::empty(), 0)?;
    builder.finish(root)
}

fn expand(builder: &mut TreeBuilder, board: Board, player: usize) -> Result<NodeId, SolverError> {
    if let Some(payoffs) = board.payoffs() {
        return Ok(builder.terminal(payoffs));
    }
    let moves: Vec<usize> = (0..9).filter(|&c| board.cells[c] == 0).collect();
    let mut children = Vec::with_capacity(moves.len());
    for &cell in &moves {
        children.push(expand(builder, board.mark(cell, player), 1 - player)?);
    }
    builder.decision(children, InfoSet::new(player, moves.len(), board.key()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_detection() {
        let mut board = Board::empty();
        for cell in [0, 1, 2] {
            board = board.mark(cell, 0);
        }
        assert_eq!(board.winner(), Some(0));
        assert_eq!(board.payoffs(), Some(vec![1.0, -1.0]));
    }

    #[test]
    fn test_draw_detection() {
        // X O X / X O O / O X X: full board, no line.
        let marks = [0, 1, 0, 0, 1, 1, 1, 0, 0];
        let mut board = Board::empty();
        for (cell, &player) in marks.iter().enumerate() {
            board = board.mark(cell, player);
        }
        assert_eq!(board.winner(), None);
        assert_eq!(board.payoffs(), Some(vec![0.0, 0.0]));
    }

    #[test]
    fn test_board_key() {
        let board = Board::empty().mark(4, 0).mark(0, 1);
        assert_eq!(board.key(), "O...X....");
    }

    #[test]
    fn test_full_tree_census() {
        let tree = build_tree().unwrap();
        assert_eq!(tree.len(), 549_946);
        assert_eq!(tree.info_sets().len(), 4_520);
        assert_eq!(tree.player_count(), 2);
        let root = tree.get(tree.root()).unwrap();
        assert_eq!(root.children().len(), 9);
        assert!(tree.info_sets().contains(&root_info_set()));
    }
}
