//! Arena-append tree construction with information-set interning.

use std::collections::HashMap;

use nashkit_engine::error::SolverError;
use nashkit_engine::node::{GameTree, InfoSet, InfoSetId, Node, NodeId};

/// Incremental builder for [`GameTree`].
///
/// Nodes are appended to a flat arena and referenced by index; children are
/// appended before their parent, the way a recursive factory naturally
/// produces them. Information sets are interned by (player, payload), so
/// decision nodes that cannot be distinguished by the acting player share a
/// dense [`InfoSetId`]. A re-registration with a different action count is
/// rejected immediately.
pub struct TreeBuilder {
    nodes: Vec<Node>,
    info_sets: Vec<InfoSet>,
    interned: HashMap<(usize, Vec<u8>), InfoSetId>,
}

impl TreeBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        TreeBuilder {
            nodes: Vec::new(),
            info_sets: Vec::new(),
            interned: HashMap::new(),
        }
    }

    /// Append a terminal node carrying one payoff per player.
    pub fn terminal(&mut self, payoffs: Vec<f64>) -> NodeId {
        self.push(Node::Terminal { payoffs })
    }

    /// Append a chance node over previously appended children.
    pub fn chance(&mut self, children: Vec<NodeId>, probabilities: Vec<f64>) -> NodeId {
        self.push(Node::Chance {
            children,
            probabilities,
        })
    }

    /// Append a decision node, interning its information set.
    ///
    /// Fails with [`SolverError::InvariantViolation`] when the child count
    /// disagrees with the set's action count, or when the same (player,
    /// payload) was registered earlier with a different action count.
    pub fn decision(
        &mut self,
        children: Vec<NodeId>,
        info_set: InfoSet,
    ) -> Result<NodeId, SolverError> {
        if children.len() != info_set.action_count {
            return Err(SolverError::InvariantViolation(format!(
                "decision node offers {} actions but its info set declares {}",
                children.len(),
                info_set.action_count
            )));
        }
        let key = (info_set.player, info_set.payload.clone());
        let id = match self.interned.get(&key) {
            Some(&id) => {
                let registered = &self.info_sets[id as usize];
                if registered.action_count != info_set.action_count {
                    return Err(SolverError::InvariantViolation(format!(
                        "info set '{}' of player {} registered with {} actions, reused with {}",
                        info_set.payload_text(),
                        info_set.player,
                        registered.action_count,
                        info_set.action_count
                    )));
                }
                id
            }
            None => {
                let id = self.info_sets.len() as InfoSetId;
                self.info_sets.push(info_set);
                self.interned.insert(key, id);
                id
            }
        };
        Ok(self.push(Node::Decision { children, info_set: id }))
    }

    /// Number of nodes appended so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no node has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of distinct information sets interned so far.
    pub fn info_set_count(&self) -> usize {
        self.info_sets.len()
    }

    /// Finish construction, validating the tree rooted at `root`.
    pub fn finish(self, root: NodeId) -> Result<GameTree, SolverError> {
        log::debug!(
            "finishing tree: {} nodes, {} info sets",
            self.nodes.len(),
            self.info_sets.len()
        );
        GameTree::from_parts(self.nodes, self.info_sets, root)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
