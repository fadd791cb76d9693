//! nashkit tree builders - game tree construction module
//!
//! This crate is responsible for building game trees and returning them to
//! the engine: a general arena builder with information-set interning, plus
//! factories for the bundled games (rock-paper-scissors, Kuhn poker,
//! tic-tac-toe, one-card poker).
//!
//! Factories construct children before parents and never mutate a node after
//! it is appended; `TreeBuilder::finish` hands the arena to the engine for
//! full structural validation.

pub mod builder;
pub mod kuhn;
pub mod one_card;
pub mod rps;
pub mod tictactoe;

pub use builder::TreeBuilder;
pub use one_card::OneCardPoker;
