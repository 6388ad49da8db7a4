//! The `Game` node as an execution dispatcher.
//!
//! [`Game`] fans one pass out to every behavior tree attached to the game
//! node. Each tree runs exactly once, in attachment order, and sees the game
//! node itself as its parent, whatever parent the caller was in. The
//! per-tree statuses are folded by the configured [`Aggregation`]; with the
//! default policy the game reports `Success` and failed trees only show up
//! in the logs.

use behavior_tree::{Aggregation, Behavior, Status};

use crate::compile::{BoxedBehavior, compile_tree};
use crate::context::ExecContext;
use crate::error::{GraphError, Result};
use crate::graph::NodeGraph;
use crate::node::{ExecuteMode, NodeId, NodeKind};

/// A compiled tree attached to a host node.
pub struct AttachedTree {
    /// The `Behavior Tree` node the tree was compiled from.
    pub id: NodeId,
    pub name: String,
    behavior: BoxedBehavior,
}

impl AttachedTree {
    pub fn new(id: NodeId, name: impl Into<String>, behavior: BoxedBehavior) -> Self {
        Self {
            id,
            name: name.into(),
            behavior,
        }
    }

    /// Compiles the `Behavior Tree` node `id` of `graph`.
    pub fn compile(graph: &NodeGraph, id: NodeId) -> Result<Self> {
        let behavior = compile_tree(graph, id)?;
        let name = graph.get(id)?.name.clone();
        Ok(Self::new(id, name, behavior))
    }

    /// Runs the tree once against `ctx`.
    pub fn execute(&self, ctx: &mut ExecContext) -> Status {
        self.behavior.tick(ctx)
    }
}

impl std::fmt::Debug for AttachedTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachedTree")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Root scene node dispatching execution to its attached trees.
#[derive(Debug)]
pub struct Game {
    id: NodeId,
    trees: Vec<AttachedTree>,
    policy: Aggregation,
}

impl Game {
    /// Creates a game with no attached trees.
    pub fn new(id: NodeId, policy: Aggregation) -> Self {
        Self {
            id,
            trees: Vec::new(),
            policy,
        }
    }

    /// Builds the dispatcher for the `Game` node `id`, compiling every
    /// attached tree whose mode is [`ExecuteMode::Always`].
    pub fn from_graph(graph: &NodeGraph, id: NodeId, policy: Aggregation) -> Result<Self> {
        let node = graph.get(id)?;
        if node.kind != NodeKind::Game {
            return Err(GraphError::WrongKind {
                id,
                expected: "Game",
                found: node.type_name(),
            });
        }

        let mut game = Self::new(id, policy);
        for tree in graph.behavior_trees_for(id) {
            if graph.get(tree)?.execute_mode() == Some(ExecuteMode::Always) {
                game.attach(AttachedTree::compile(graph, tree)?);
            }
        }

        tracing::debug!(
            "game {} compiled {} attached trees (policy: {})",
            id,
            game.trees.len(),
            policy
        );
        Ok(game)
    }

    /// Appends a tree; it runs after every tree attached before it.
    pub fn attach(&mut self, tree: AttachedTree) {
        self.trees.push(tree);
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn policy(&self) -> Aggregation {
        self.policy
    }

    pub fn trees(&self) -> &[AttachedTree] {
        &self.trees
    }

    /// Runs one pass over every attached tree.
    ///
    /// The caller's parent is ignored while the trees run and restored
    /// before returning.
    pub fn execute(&self, ctx: &mut ExecContext) -> Status {
        let previous = ctx.enter(self.id);
        let mut results = Vec::with_capacity(self.trees.len());

        for tree in &self.trees {
            // Every tree starts from the game itself, even if the previous
            // tree left a different parent behind.
            ctx.enter(self.id);
            let status = tree.execute(ctx);
            if status.is_failure() {
                tracing::debug!("tree {} ({}) failed in game {}", tree.id, tree.name, self.id);
            }
            results.push(status);
            if self.policy.short_circuits(status) {
                break;
            }
        }

        ctx.leave(previous);
        self.policy.combine(results)
    }
}

impl Behavior<ExecContext> for Game {
    fn tick(&self, ctx: &mut ExecContext) -> Status {
        self.execute(ctx)
    }
}
