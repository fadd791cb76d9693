//! nashkit engine - core solver types and logic
//!
//! This crate contains the equilibrium-solving core: the immutable game-tree
//! data model, the information-set registry, per-info-set regret state, and
//! the CFR family of solvers (vanilla, CFR+, Discounted CFR) sharing one
//! full-tree traversal.
//!
//! The engine is game-agnostic and has zero UI dependencies; trees are
//! produced by factories (see the companion `nashkit-tree` crate) and
//! consumed read-only.

pub mod cfr;
pub mod error;
pub mod node;
pub mod state;
pub mod test_tree;
pub mod variant;

pub use cfr::Solver;
pub use error::SolverError;
pub use node::{GameTree, InfoSet, InfoSetId, Node, NodeId};
pub use state::InfoSetState;
pub use variant::Variant;
