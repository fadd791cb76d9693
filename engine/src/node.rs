//! Node definitions and the arena-backed game tree.
//!
//! This module defines the core node types that represent positions in an
//! extensive-form game. Nodes are immutable and separate from solver state
//! (regrets, strategies): a factory builds the tree once, the solver only
//! reads it.
//!
//! The tree is a flat arena (`Vec<Node>` indexed by [`NodeId`]) for cache
//! locality and cheap sharing across read-only consumers. Decision nodes
//! carry a dense [`InfoSetId`] into the tree's information-set registry, so
//! the traversal never hashes on the hot path.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;

/// Node ID type (index into flat array storage).
pub type NodeId = u32;

/// Information set ID type (dense index into the tree's registry).
pub type InfoSetId = u32;

/// Tolerance for chance probability vectors summing to one.
pub const PROBABILITY_EPSILON: f64 = 1e-9;

/// An information set: the decision points one player cannot tell apart.
///
/// Identity is by value: two `InfoSet`s with equal player, action count, and
/// payload denote the same set and share solver state. The payload is an
/// opaque byte string produced by the tree factory (a board position, a
/// betting history, ...); the engine only compares and hashes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InfoSet {
    /// Index of the acting player, in `[0, player_count)`.
    pub player: usize,
    /// Number of actions available. Every decision node assigned to this set
    /// has exactly this many children.
    pub action_count: usize,
    /// Opaque discriminator between sets that share a player and action count
    /// but differ in observable history.
    pub payload: Vec<u8>,
}

impl InfoSet {
    /// Create an information set. The payload is typically a formatted
    /// string, but any byte sequence works.
    pub fn new(player: usize, action_count: usize, payload: impl Into<Vec<u8>>) -> Self {
        InfoSet {
            player,
            action_count,
            payload: payload.into(),
        }
    }

    /// The payload rendered as text, for logs and CLI output.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// A node in the game tree.
///
/// Exactly three shapes: terminals carry a payoff per player, chance nodes
/// carry a probability distribution over their children, decision nodes
/// carry the information set the acting player sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// Leaf carrying one payoff per player.
    Terminal {
        /// Payoff vector of length `player_count`.
        payoffs: Vec<f64>,
    },
    /// Node where nature picks a child according to a fixed distribution.
    Chance {
        /// Child node IDs in declared order.
        children: Vec<NodeId>,
        /// Probability per child; non-negative, summing to one.
        probabilities: Vec<f64>,
    },
    /// Node where a player must act.
    Decision {
        /// Child node IDs, one per action, in declared order.
        children: Vec<NodeId>,
        /// Dense index of the information set this node belongs to.
        info_set: InfoSetId,
    },
}

impl Node {
    /// Get child node IDs (empty for terminals).
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Terminal { .. } => &[],
            Node::Chance { children, .. } => children,
            Node::Decision { children, .. } => children,
        }
    }

    /// Get the information set ID (only present on decision nodes).
    pub fn info_set(&self) -> Option<InfoSetId> {
        match self {
            Node::Decision { info_set, .. } => Some(*info_set),
            _ => None,
        }
    }

    /// Check if this is a terminal node.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Node::Terminal { .. })
    }

    /// Check if this is a chance node.
    pub fn is_chance(&self) -> bool {
        matches!(self, Node::Chance { .. })
    }

    /// Check if this is a decision node.
    pub fn is_decision(&self) -> bool {
        matches!(self, Node::Decision { .. })
    }
}

/// An immutable extensive-form game tree.
///
/// Contains a flat array of nodes plus the registry of distinct information
/// sets. Constructed through [`GameTree::from_parts`], which enforces every
/// structural invariant; there is no API to mutate a node afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameTree {
    nodes: Vec<Node>,
    info_sets: Vec<InfoSet>,
    root: NodeId,
    player_count: usize,
}

impl GameTree {
    /// Assemble a tree from its parts, validating all invariants.
    ///
    /// Fails with [`SolverError::InvariantViolation`] if any node's children
    /// are out of bounds, a node is reachable from the root by more than one
    /// path (cycle or shared subtree), chance probabilities do not sum to
    /// one, a decision node's child count disagrees with its information
    /// set's action count, terminal payoff vectors differ in length, a
    /// player index is out of range, or the registry contains duplicates.
    pub fn from_parts(
        nodes: Vec<Node>,
        info_sets: Vec<InfoSet>,
        root: NodeId,
    ) -> Result<Self, SolverError> {
        let player_count = check_structure(&nodes, &info_sets, root)?;
        Ok(GameTree {
            nodes,
            info_sets,
            root,
            player_count,
        })
    }

    /// Re-run the structural checks.
    ///
    /// Solver construction calls this so that trees obtained through
    /// deserialization get the same guarantees as freshly built ones.
    pub fn validate(&self) -> Result<(), SolverError> {
        let player_count = check_structure(&self.nodes, &self.info_sets, self.root)?;
        if player_count != self.player_count {
            return Err(SolverError::InvariantViolation(format!(
                "recorded player count {} does not match payoff vectors of length {}",
                self.player_count, player_count
            )));
        }
        Ok(())
    }

    /// The root node ID.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of players, taken from the terminal payoff vector length.
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// All nodes, indexed by [`NodeId`].
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The registry of distinct information sets, indexed by [`InfoSetId`].
    pub fn info_sets(&self) -> &[InfoSet] {
        &self.info_sets
    }

    /// Get a registered information set by dense ID.
    pub fn info_set(&self, id: InfoSetId) -> Option<&InfoSet> {
        self.info_sets.get(id as usize)
    }

    /// Get the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Validate nodes and registry; returns the player count on success.
fn check_structure(
    nodes: &[Node],
    info_sets: &[InfoSet],
    root: NodeId,
) -> Result<usize, SolverError> {
    if nodes.is_empty() {
        return Err(SolverError::InvariantViolation(
            "tree has no nodes".to_string(),
        ));
    }
    if root as usize >= nodes.len() {
        return Err(SolverError::InvariantViolation(format!(
            "root id {} is out of bounds for {} nodes",
            root,
            nodes.len()
        )));
    }

    let mut payoff_len: Option<usize> = None;
    for (id, node) in nodes.iter().enumerate() {
        for &child in node.children() {
            if child as usize >= nodes.len() {
                return Err(SolverError::InvariantViolation(format!(
                    "node {} references out-of-bounds child {}",
                    id, child
                )));
            }
        }
        match node {
            Node::Terminal { payoffs } => {
                if payoffs.is_empty() {
                    return Err(SolverError::InvariantViolation(format!(
                        "terminal node {} has an empty payoff vector",
                        id
                    )));
                }
                match payoff_len {
                    None => payoff_len = Some(payoffs.len()),
                    Some(len) if len != payoffs.len() => {
                        return Err(SolverError::InvariantViolation(format!(
                            "terminal node {} has {} payoffs where earlier terminals have {}",
                            id,
                            payoffs.len(),
                            len
                        )));
                    }
                    Some(_) => {}
                }
            }
            Node::Chance {
                children,
                probabilities,
            } => {
                if children.is_empty() {
                    return Err(SolverError::InvariantViolation(format!(
                        "chance node {} has no children",
                        id
                    )));
                }
                if children.len() != probabilities.len() {
                    return Err(SolverError::InvariantViolation(format!(
                        "chance node {} has {} children but {} probabilities",
                        id,
                        children.len(),
                        probabilities.len()
                    )));
                }
                if probabilities.iter().any(|&p| !p.is_finite() || p < 0.0) {
                    return Err(SolverError::InvariantViolation(format!(
                        "chance node {} has a negative or non-finite probability",
                        id
                    )));
                }
                let total: f64 = probabilities.iter().sum();
                if (total - 1.0).abs() > PROBABILITY_EPSILON {
                    return Err(SolverError::InvariantViolation(format!(
                        "chance node {} probabilities sum to {}",
                        id, total
                    )));
                }
            }
            Node::Decision { children, info_set } => {
                let set = info_sets.get(*info_set as usize).ok_or_else(|| {
                    SolverError::InvariantViolation(format!(
                        "decision node {} references unregistered info set {}",
                        id, info_set
                    ))
                })?;
                if children.len() != set.action_count {
                    return Err(SolverError::InvariantViolation(format!(
                        "decision node {} has {} children but its info set expects {} actions",
                        id,
                        children.len(),
                        set.action_count
                    )));
                }
            }
        }
    }

    let mut seen = HashSet::with_capacity(info_sets.len());
    for (id, set) in info_sets.iter().enumerate() {
        if set.action_count == 0 {
            return Err(SolverError::InvariantViolation(format!(
                "info set {} has zero actions",
                id
            )));
        }
        if !seen.insert(set) {
            return Err(SolverError::InvariantViolation(format!(
                "info set {} duplicates an earlier registry entry",
                id
            )));
        }
    }

    // Walk from the root; reaching any node twice means a cycle or a shared
    // subtree, neither of which is a tree.
    let mut visited = vec![false; nodes.len()];
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let idx = id as usize;
        if visited[idx] {
            return Err(SolverError::InvariantViolation(format!(
                "node {} is reachable by more than one path",
                id
            )));
        }
        visited[idx] = true;
        stack.extend_from_slice(nodes[idx].children());
    }

    let player_count = payoff_len.ok_or_else(|| {
        SolverError::InvariantViolation("tree has no terminal nodes".to_string())
    })?;
    for (id, set) in info_sets.iter().enumerate() {
        if set.player >= player_count {
            return Err(SolverError::InvariantViolation(format!(
                "info set {} names player {} in a {}-player game",
                id, set.player, player_count
            )));
        }
    }

    Ok(player_count)
}
