//! Execution context threaded through one pass.
//!
//! The context is the "blackboard" every compiled behavior sees. It carries
//! the pass-wide [`BehaviorTreeRoot`], the frame's [`InputState`], the
//! current [`FloatVariables`] and the id of the node currently acting as
//! parent. The parent is a plain id that
//! each host swaps in before ticking a child and restores afterwards
//! ([`ExecContext::enter`] / [`ExecContext::leave`]), so it always reflects
//! the traversal position rather than a stored graph edge.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::NodeGraph;
use crate::node::{NodeId, NodeKind};

/// Root state of behavior evaluation for one running game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorTreeRoot {
    /// Node the evaluation was started for (the `Game` node).
    pub owner: NodeId,
    /// Nodes that reported completion through a `Scene Finished` node.
    pub has_run: Vec<NodeId>,
    /// Set once a `Scene Finished` node fires, cleared by `Restart`.
    pub finished: bool,
}

impl BehaviorTreeRoot {
    pub fn new(owner: NodeId) -> Self {
        Self {
            owner,
            has_run: Vec::new(),
            finished: false,
        }
    }

    /// Forgets everything recorded so far.
    pub fn reset(&mut self) {
        self.has_run.clear();
        self.finished = false;
    }
}

/// Input sampled for a single pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    keys_down: BTreeSet<u16>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a held key.
    pub fn with_key(mut self, key_code: u16) -> Self {
        self.keys_down.insert(key_code);
        self
    }

    pub fn press(&mut self, key_code: u16) {
        self.keys_down.insert(key_code);
    }

    pub fn release(&mut self, key_code: u16) {
        self.keys_down.remove(&key_code);
    }

    pub fn is_down(&self, key_code: u16) -> bool {
        self.keys_down.contains(&key_code)
    }
}

impl FromIterator<u16> for InputState {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self {
            keys_down: iter.into_iter().collect(),
        }
    }
}

/// Live values of `Float Variable` nodes, keyed by node id.
///
/// Values persist across passes; the graph itself is never written to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatVariables {
    values: BTreeMap<NodeId, f32>,
}

impl FloatVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `Float Variable` of `graph` at its default value.
    pub fn from_graph(graph: &NodeGraph) -> Self {
        graph
            .nodes()
            .filter_map(|node| match node.kind {
                NodeKind::FloatVariable { default_value } => Some((node.id, default_value)),
                _ => None,
            })
            .collect()
    }

    pub fn get(&self, id: NodeId) -> Option<f32> {
        self.values.get(&id).copied()
    }

    pub fn set(&mut self, id: NodeId, value: f32) {
        self.values.insert(id, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Variables in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f32)> + '_ {
        self.values.iter().map(|(id, value)| (*id, *value))
    }
}

impl FromIterator<(NodeId, f32)> for FloatVariables {
    fn from_iter<I: IntoIterator<Item = (NodeId, f32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Context handed to every behavior during a pass.
#[derive(Debug, Clone)]
pub struct ExecContext {
    pub root: BehaviorTreeRoot,
    pub input: InputState,
    pub variables: FloatVariables,
    parent: Option<NodeId>,
}

impl ExecContext {
    /// Creates a context for evaluating trees owned by `owner`.
    ///
    /// No parent is set until a host enters.
    pub fn new(owner: NodeId) -> Self {
        Self {
            root: BehaviorTreeRoot::new(owner),
            input: InputState::default(),
            variables: FloatVariables::default(),
            parent: None,
        }
    }

    /// Node currently acting as parent of the behavior being ticked.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Makes `node` the parent for the children about to run and returns
    /// the previous parent, which must be handed back to [`ExecContext::leave`].
    #[inline]
    pub fn enter(&mut self, node: NodeId) -> Option<NodeId> {
        self.parent.replace(node)
    }

    /// Restores the parent saved by [`ExecContext::enter`].
    #[inline]
    pub fn leave(&mut self, previous: Option<NodeId>) {
        self.parent = previous;
    }

    /// Runs `f` with `node` as parent, restoring the previous parent afterwards.
    pub fn scoped<R>(&mut self, node: NodeId, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.enter(node);
        let result = f(self);
        self.leave(previous);
        result
    }
}
