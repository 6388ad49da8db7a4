//! Node arena and behavior connections.
//!
//! [`NodeGraph`] owns every node of a project. Nodes refer to each other only
//! by [`NodeId`]: container nodes list their members in `subset`, and
//! behavior nodes are linked parent -> child through [`Connection`]s. No node
//! holds a reference to another, so the graph can be edited, cloned and
//! serialized freely.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::node::{Node, NodeId, NodeKind};

/// Directed behavior edge from a parent's output to a child's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
}

/// All nodes and connections of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeGraph {
    nodes: Vec<Node>,
    #[serde(default)]
    connections: Vec<Connection>,
    /// Next id to hand out. Wider than `NodeId` so it can step past `u32::MAX`.
    #[serde(skip)]
    next_id: u64,
}

impl NodeGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node of the given kind and returns its id.
    ///
    /// Fails with [`GraphError::IdsExhausted`] once an id of `u32::MAX` has
    /// been handed out or inserted.
    pub fn add(&mut self, kind: NodeKind) -> Result<NodeId> {
        let id = self.allocate_id()?;
        self.nodes.push(Node::new(id, kind));
        Ok(id)
    }

    /// Adds a node of the given kind with a custom name.
    pub fn add_named(&mut self, kind: NodeKind, name: impl Into<String>) -> Result<NodeId> {
        let id = self.allocate_id()?;
        self.nodes.push(Node::new(id, kind).with_name(name));
        Ok(id)
    }

    /// Inserts a fully built node, keeping its id.
    pub fn insert(&mut self, node: Node) -> Result<NodeId> {
        if self.contains(node.id) {
            return Err(GraphError::DuplicateId(node.id));
        }
        let id = node.id;
        self.next_id = self.next_id.max(u64::from(id.0) + 1);
        self.nodes.push(node);
        Ok(id)
    }

    /// Removes a node together with its connections, subset references and
    /// variable bindings.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let index = self.index_of(id)?;
        let node = self.nodes.remove(index);

        self.connections.retain(|c| c.from != id && c.to != id);
        for other in &mut self.nodes {
            if let Some(subset) = other.subset.as_mut() {
                subset.retain(|member| *member != id);
            }
            if let Some(target) = other.kind.variable_mut()
                && *target == Some(id)
            {
                *target = None;
            }
        }

        tracing::debug!("removed node {} ({})", id, node.type_name());
        Some(node)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Looks up a node, failing with [`GraphError::UnknownNode`].
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.node(id).ok_or(GraphError::UnknownNode(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node carrying the given type tag.
    pub fn node_of_type(&self, type_name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.type_name() == type_name)
    }

    /// First behavior tree root with the given display name.
    pub fn behavior_tree_named(&self, name: &str) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|n| n.is_behavior_tree() && n.name == name)
    }

    /// Links `from`'s output to `to`'s input.
    ///
    /// The child is appended after the parent's existing children.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        let parent = self.get(from)?;
        let child = self.get(to)?;

        if from == to {
            return Err(GraphError::SelfConnection(from));
        }
        if !child.kind.has_input() {
            return Err(GraphError::NotConnectable {
                id: to,
                type_name: child.type_name(),
            });
        }
        if let Some(capacity) = parent.kind.child_capacity()
            && self.children(from).count() >= capacity
        {
            return Err(GraphError::SlotsExhausted {
                id: from,
                type_name: parent.type_name(),
                capacity,
            });
        }
        if self.connections.iter().any(|c| c.from == from && c.to == to) {
            return Err(GraphError::DuplicateConnection { from, to });
        }
        if self.reaches(to, from) {
            return Err(GraphError::WouldCycle { from, to });
        }

        self.connections.push(Connection { from, to });
        Ok(())
    }

    /// Removes the connection `from -> to`. Returns `false` if it did not exist.
    pub fn disconnect(&mut self, from: NodeId, to: NodeId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| !(c.from == from && c.to == to));
        self.connections.len() != before
    }

    /// Behavior children of a node, in connection order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.connections
            .iter()
            .filter(move |c| c.from == id)
            .map(|c| c.to)
    }

    /// Adds `member` to the subset of the container `owner`.
    ///
    /// Attaching an existing member is a no-op.
    pub fn attach(&mut self, owner: NodeId, member: NodeId) -> Result<()> {
        if !self.contains(member) {
            return Err(GraphError::UnknownNode(member));
        }
        let node = self.node_mut(owner).ok_or(GraphError::UnknownNode(owner))?;
        let type_name = node.type_name();
        let subset = node
            .subset
            .as_mut()
            .ok_or(GraphError::NotContainer { id: owner, type_name })?;

        if !subset.contains(&member) {
            subset.push(member);
        }
        Ok(())
    }

    /// Removes `member` from the subset of `owner`. Returns `false` if it was
    /// not a member.
    pub fn detach(&mut self, owner: NodeId, member: NodeId) -> bool {
        let Some(subset) = self.node_mut(owner).and_then(|n| n.subset.as_mut()) else {
            return false;
        };
        let before = subset.len();
        subset.retain(|m| *m != member);
        subset.len() != before
    }

    /// Points the arithmetic node `node` at the `Float Variable` `variable`.
    pub fn bind_variable(&mut self, node: NodeId, variable: NodeId) -> Result<()> {
        let target = self.get(variable)?;
        if !matches!(target.kind, NodeKind::FloatVariable { .. }) {
            return Err(GraphError::WrongKind {
                id: variable,
                expected: "Float Variable",
                found: target.type_name(),
            });
        }

        let arithmetic = self.node_mut(node).ok_or(GraphError::UnknownNode(node))?;
        let found = arithmetic.type_name();
        let slot = arithmetic
            .kind
            .variable_mut()
            .ok_or(GraphError::WrongKind {
                id: node,
                expected: "Float arithmetic node",
                found,
            })?;
        *slot = Some(variable);
        Ok(())
    }

    /// Behavior tree roots attached to `owner`, in subset order.
    pub fn behavior_trees_for(&self, owner: NodeId) -> Vec<NodeId> {
        let Some(node) = self.node(owner) else {
            return Vec::new();
        };
        node.members()
            .iter()
            .copied()
            .filter(|id| self.node(*id).is_some_and(Node::is_behavior_tree))
            .collect()
    }

    /// Serializes the whole graph to compact JSON.
    pub fn encode_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the whole graph to indented JSON.
    pub fn encode_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes and validates a graph.
    pub fn decode_json(json: &str) -> Result<Self> {
        let mut graph: NodeGraph = serde_json::from_str(json)?;
        graph.validate()?;
        graph.next_id = graph
            .nodes
            .iter()
            .map(|n| u64::from(n.id.0) + 1)
            .max()
            .unwrap_or(0);
        Ok(graph)
    }

    /// Writes the graph as indented JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.encode_json_pretty()?)?;
        Ok(())
    }

    /// Reads and validates a graph written by [`NodeGraph::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::decode_json(&json)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id) {
                return Err(GraphError::DuplicateId(node.id));
            }
        }

        for node in &self.nodes {
            let mut referenced = node.members().iter().copied().chain(node.kind.variable());
            if let Some(missing) = referenced.find(|m| !seen.contains(m)) {
                return Err(GraphError::DanglingReference {
                    from: node.id,
                    missing,
                });
            }
        }

        for c in &self.connections {
            for end in [c.from, c.to] {
                if !seen.contains(&end) {
                    let from = if end == c.from { c.to } else { c.from };
                    return Err(GraphError::DanglingReference { from, missing: end });
                }
            }
        }

        Ok(())
    }

    /// Returns `true` if `target` is reachable from `start` through
    /// behavior connections (or is `start` itself).
    fn reaches(&self, start: NodeId, target: NodeId) -> bool {
        let mut stack = vec![start];
        let mut visited = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if visited.insert(id) {
                stack.extend(self.children(id));
            }
        }
        false
    }

    fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    fn allocate_id(&mut self) -> Result<NodeId> {
        let id = u32::try_from(self.next_id).map_err(|_| GraphError::IdsExhausted)?;
        self.next_id += 1;
        Ok(NodeId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::COMPOSITE_SLOTS;

    #[test]
    fn ids_are_allocated_in_order() {
        let mut graph = NodeGraph::new();
        let a = graph.add(NodeKind::Game).unwrap();
        let b = graph.add(NodeKind::behavior_tree()).unwrap();

        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn insert_rejects_duplicate_ids_and_bumps_allocator() {
        let mut graph = NodeGraph::new();
        graph.insert(Node::new(NodeId(10), NodeKind::Scene)).unwrap();

        assert!(matches!(
            graph.insert(Node::new(NodeId(10), NodeKind::Object)),
            Err(GraphError::DuplicateId(NodeId(10)))
        ));
        assert_eq!(graph.add(NodeKind::Object).unwrap(), NodeId(11));
    }

    #[test]
    fn allocation_stops_after_the_last_id() {
        let mut graph = NodeGraph::new();
        graph
            .insert(Node::new(NodeId(u32::MAX - 1), NodeKind::Scene))
            .unwrap();

        assert_eq!(graph.add(NodeKind::Object).unwrap(), NodeId(u32::MAX));
        assert!(matches!(
            graph.add(NodeKind::Object),
            Err(GraphError::IdsExhausted)
        ));
        assert!(matches!(
            graph.add_named(NodeKind::Object, "late"),
            Err(GraphError::IdsExhausted)
        ));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn inserting_the_last_id_exhausts_allocation() {
        let mut graph = NodeGraph::new();
        graph
            .insert(Node::new(NodeId(u32::MAX), NodeKind::Scene))
            .unwrap();

        assert!(matches!(
            graph.add(NodeKind::Object),
            Err(GraphError::IdsExhausted)
        ));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn decoding_the_last_id_exhausts_allocation() {
        let json = r#"{ "nodes": [ { "id": 4294967295, "name": "Scene", "type": "Scene", "subset": [] } ] }"#;
        let mut graph = NodeGraph::decode_json(json).unwrap();

        assert!(matches!(
            graph.add(NodeKind::Object),
            Err(GraphError::IdsExhausted)
        ));
    }

    #[test]
    fn bind_variable_checks_both_ends() {
        let mut graph = NodeGraph::new();
        let lives = graph
            .add(NodeKind::FloatVariable { default_value: 3.0 })
            .unwrap();
        let reset = graph
            .add(NodeKind::ResetFloatVariable { variable: None })
            .unwrap();
        let seq = graph.add(NodeKind::Sequence).unwrap();

        graph.bind_variable(reset, lives).unwrap();
        assert_eq!(graph.get(reset).unwrap().kind.variable(), Some(lives));

        assert!(matches!(
            graph.bind_variable(reset, seq),
            Err(GraphError::WrongKind { expected: "Float Variable", .. })
        ));
        assert!(matches!(
            graph.bind_variable(seq, lives),
            Err(GraphError::WrongKind { .. })
        ));
        assert!(matches!(
            graph.bind_variable(reset, NodeId(50)),
            Err(GraphError::UnknownNode(NodeId(50)))
        ));
    }

    #[test]
    fn removing_a_variable_unbinds_it() {
        let mut graph = NodeGraph::new();
        let lives = graph
            .add(NodeKind::FloatVariable { default_value: 3.0 })
            .unwrap();
        let test = graph
            .add(NodeKind::TestFloatVariable {
                variable: None,
                mode: crate::node::FloatTest::EqualTo,
                value: 0.0,
            })
            .unwrap();
        graph.bind_variable(test, lives).unwrap();

        graph.remove(lives).unwrap();
        assert_eq!(graph.get(test).unwrap().kind.variable(), None);
    }

    #[test]
    fn dangling_variable_references_are_rejected() {
        let json = r#"{
            "nodes": [ { "id": 1, "name": "Reset Float", "type": "Reset Float Variable", "variable": 7 } ]
        }"#;

        assert!(matches!(
            NodeGraph::decode_json(json),
            Err(GraphError::DanglingReference {
                from: NodeId(1),
                missing: NodeId(7)
            })
        ));
    }

    #[test]
    fn children_keep_connection_order() {
        let mut graph = NodeGraph::new();
        let seq = graph.add(NodeKind::Sequence).unwrap();
        let a = graph.add(NodeKind::Restart).unwrap();
        let b = graph.add(NodeKind::KeyDown { key_code: 1 }).unwrap();

        graph.connect(seq, b).unwrap();
        graph.connect(seq, a).unwrap();

        assert_eq!(graph.children(seq).collect::<Vec<_>>(), vec![b, a]);
    }

    #[test]
    fn connect_rejects_invalid_edges() {
        let mut graph = NodeGraph::new();
        let tree = graph.add(NodeKind::behavior_tree()).unwrap();
        let seq = graph.add(NodeKind::Sequence).unwrap();
        let inv = graph.add(NodeKind::Inverter).unwrap();
        let restart = graph.add(NodeKind::Restart).unwrap();
        let osx = graph
            .add(NodeKind::PlatformOsx {
                width: 800,
                height: 600,
            })
            .unwrap();

        assert!(matches!(
            graph.connect(seq, seq),
            Err(GraphError::SelfConnection(_))
        ));
        assert!(matches!(
            graph.connect(seq, tree),
            Err(GraphError::NotConnectable { .. })
        ));
        assert!(matches!(
            graph.connect(seq, osx),
            Err(GraphError::NotConnectable { .. })
        ));
        assert!(matches!(
            graph.connect(restart, seq),
            Err(GraphError::SlotsExhausted { capacity: 0, .. })
        ));
        assert!(matches!(
            graph.connect(seq, NodeId(99)),
            Err(GraphError::UnknownNode(NodeId(99)))
        ));

        graph.connect(inv, restart).unwrap();
        assert!(matches!(
            graph.connect(inv, seq),
            Err(GraphError::SlotsExhausted { capacity: 1, .. })
        ));

        graph.connect(tree, seq).unwrap();
        assert!(matches!(
            graph.connect(tree, seq),
            Err(GraphError::DuplicateConnection { .. })
        ));
    }

    #[test]
    fn connect_rejects_cycles() {
        let mut graph = NodeGraph::new();
        let a = graph.add(NodeKind::Sequence).unwrap();
        let b = graph.add(NodeKind::Selector).unwrap();
        let c = graph.add(NodeKind::Inverter).unwrap();

        graph.connect(a, b).unwrap();
        graph.connect(b, c).unwrap();

        assert!(matches!(
            graph.connect(c, a),
            Err(GraphError::WouldCycle { .. })
        ));
    }

    #[test]
    fn composite_slots_are_limited() {
        let mut graph = NodeGraph::new();
        let sel = graph.add(NodeKind::Selector).unwrap();
        for _ in 0..COMPOSITE_SLOTS {
            let leaf = graph.add(NodeKind::Restart).unwrap();
            graph.connect(sel, leaf).unwrap();
        }
        let extra = graph.add(NodeKind::Restart).unwrap();

        assert!(matches!(
            graph.connect(sel, extra),
            Err(GraphError::SlotsExhausted { .. })
        ));
    }

    #[test]
    fn tree_root_has_unbounded_children() {
        let mut graph = NodeGraph::new();
        let tree = graph.add(NodeKind::behavior_tree()).unwrap();
        for _ in 0..(COMPOSITE_SLOTS * 2) {
            let leaf = graph.add(NodeKind::Restart).unwrap();
            graph.connect(tree, leaf).unwrap();
        }
        assert_eq!(graph.children(tree).count(), COMPOSITE_SLOTS * 2);
    }

    #[test]
    fn attach_requires_container_and_is_idempotent() {
        let mut graph = NodeGraph::new();
        let game = graph.add(NodeKind::Game).unwrap();
        let tree = graph.add(NodeKind::behavior_tree()).unwrap();
        let seq = graph.add(NodeKind::Sequence).unwrap();

        graph.attach(game, tree).unwrap();
        graph.attach(game, tree).unwrap();
        assert_eq!(graph.get(game).unwrap().members(), &[tree]);

        assert!(matches!(
            graph.attach(seq, tree),
            Err(GraphError::NotContainer { .. })
        ));
        assert!(matches!(
            graph.attach(game, NodeId(42)),
            Err(GraphError::UnknownNode(_))
        ));

        assert!(graph.detach(game, tree));
        assert!(!graph.detach(game, tree));
    }

    #[test]
    fn behavior_trees_for_filters_subset_in_order() {
        let mut graph = NodeGraph::new();
        let game = graph.add(NodeKind::Game).unwrap();
        let second = graph.add_named(NodeKind::behavior_tree(), "second").unwrap();
        let scene = graph.add(NodeKind::Scene).unwrap();
        let first = graph.add_named(NodeKind::behavior_tree(), "first").unwrap();

        graph.attach(game, second).unwrap();
        graph.attach(game, scene).unwrap();
        graph.attach(game, first).unwrap();

        assert_eq!(graph.behavior_trees_for(game), vec![second, first]);
        assert!(graph.behavior_trees_for(NodeId(77)).is_empty());
    }

    #[test]
    fn remove_cleans_up_references() {
        let mut graph = NodeGraph::new();
        let game = graph.add(NodeKind::Game).unwrap();
        let tree = graph.add(NodeKind::behavior_tree()).unwrap();
        let seq = graph.add(NodeKind::Sequence).unwrap();
        graph.attach(game, tree).unwrap();
        graph.connect(tree, seq).unwrap();

        let removed = graph.remove(tree).unwrap();

        assert!(removed.is_behavior_tree());
        assert!(graph.get(game).unwrap().members().is_empty());
        assert!(graph.connections().is_empty());
        assert!(graph.remove(tree).is_none());
    }

    #[test]
    fn node_of_type_finds_first_match() {
        let mut graph = NodeGraph::new();
        graph.add(NodeKind::Scene).unwrap();
        let game = graph.add(NodeKind::Game).unwrap();

        assert_eq!(graph.node_of_type("Game").map(|n| n.id), Some(game));
        assert!(graph.node_of_type("Platform OSX").is_none());
    }
}
