//! Error types surfaced by the engine.

use thiserror::Error;

/// Errors produced during tree validation, solver construction, and queries.
///
/// Nothing is recovered internally; every error propagates to the caller.
/// Zero chance probabilities, zero reach weights, and terminal-only trees are
/// normal inputs, not errors.
#[derive(Debug, Error)]
pub enum SolverError {
    /// A structural invariant of the game tree is broken: a cycle or shared
    /// subtree, a decision node whose child count disagrees with its
    /// information set, chance probabilities that do not sum to one, or a
    /// malformed payoff vector.
    #[error("tree invariant violated: {0}")]
    InvariantViolation(String),

    /// A query referenced an information set that is not registered in the
    /// solver's tree.
    #[error("unknown information set")]
    UnknownInformationSet,

    /// A constructor argument is outside its valid range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
