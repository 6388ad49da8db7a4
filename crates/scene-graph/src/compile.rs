//! Turning graph nodes into executable behaviors.
//!
//! A behavior tree is edited as nodes and connections but executed as a tree
//! of [`Behavior`] trait objects. [`compile_tree`] walks the connections below
//! a `Behavior Tree` node and builds that tree once, using the composites
//! from `behavior_tree` for `Sequence`, `Selector`, `Inverter` and
//! `Always Succeed`, and the leaves in this module for the rest.
//!
//! Every child is wrapped in [`Scoped`] so that it sees the node it hangs
//! under as its parent. Decorators compile over everything connected below
//! them, so a project file that gives one more than a single child still
//! runs each of those children.

use behavior_tree::{Behavior, Status, builder};

use crate::context::ExecContext;
use crate::error::{GraphError, Result};
use crate::graph::NodeGraph;
use crate::node::{FloatTest, NodeId, NodeKind};

/// Compiled behavior over the scene execution context.
pub type BoxedBehavior = Box<dyn Behavior<ExecContext>>;

/// Runs its child with a fixed node as parent.
pub struct Scoped {
    parent: NodeId,
    child: BoxedBehavior,
}

impl Scoped {
    pub fn new(parent: NodeId, child: BoxedBehavior) -> Self {
        Self { parent, child }
    }
}

impl Behavior<ExecContext> for Scoped {
    fn tick(&self, ctx: &mut ExecContext) -> Status {
        ctx.scoped(self.parent, |ctx| self.child.tick(ctx))
    }
}

/// Root of a compiled tree.
///
/// Runs every child in order; the last child's status is the tree's status.
/// A tree with nothing connected succeeds.
pub struct TreeRoot {
    children: Vec<BoxedBehavior>,
}

impl TreeRoot {
    pub fn new(children: Vec<BoxedBehavior>) -> Self {
        Self { children }
    }
}

impl Behavior<ExecContext> for TreeRoot {
    fn tick(&self, ctx: &mut ExecContext) -> Status {
        let mut status = Status::Success;
        for child in &self.children {
            status = child.tick(ctx);
        }
        status
    }
}

/// Succeeds while the key is held in the current frame.
pub struct KeyDown {
    pub key_code: u16,
}

impl Behavior<ExecContext> for KeyDown {
    fn tick(&self, ctx: &mut ExecContext) -> Status {
        if ctx.input.is_down(self.key_code) {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

/// Clears the completion bookkeeping of the root.
pub struct Restart;

impl Behavior<ExecContext> for Restart {
    fn tick(&self, ctx: &mut ExecContext) -> Status {
        tracing::debug!("restart: clearing {} completed nodes", ctx.root.has_run.len());
        ctx.root.reset();
        Status::Success
    }
}

/// Marks the current parent as having run and finishes the game.
pub struct SceneFinished;

impl Behavior<ExecContext> for SceneFinished {
    fn tick(&self, ctx: &mut ExecContext) -> Status {
        let by = ctx.parent().unwrap_or(ctx.root.owner);
        ctx.root.has_run.push(by);
        ctx.root.finished = true;
        tracing::debug!("scene finished by {}", by);
        Status::Success
    }
}

/// A `Float Variable` resolved at compile time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableRef {
    pub id: NodeId,
    pub default_value: f32,
}

impl VariableRef {
    /// Resolves the variable an arithmetic node points at. Unset targets and
    /// targets that are not `Float Variable` nodes resolve to `None`.
    fn resolve(graph: &NodeGraph, target: Option<NodeId>) -> Option<Self> {
        let node = graph.node(target?)?;
        match node.kind {
            NodeKind::FloatVariable { default_value } => Some(Self {
                id: node.id,
                default_value,
            }),
            _ => None,
        }
    }

    fn value(self, ctx: &ExecContext) -> f32 {
        ctx.variables.get(self.id).unwrap_or(self.default_value)
    }
}

/// Puts a variable back to its default value.
pub struct ResetFloat {
    pub target: Option<VariableRef>,
}

impl Behavior<ExecContext> for ResetFloat {
    fn tick(&self, ctx: &mut ExecContext) -> Status {
        let Some(var) = self.target else {
            return Status::Failure;
        };
        ctx.variables.set(var.id, var.default_value);
        Status::Success
    }
}

/// Adds a constant to a variable, clamping at `max`.
pub struct AddFloat {
    pub target: Option<VariableRef>,
    pub value: f32,
    pub max: f32,
}

impl Behavior<ExecContext> for AddFloat {
    fn tick(&self, ctx: &mut ExecContext) -> Status {
        let Some(var) = self.target else {
            return Status::Failure;
        };
        let sum = (var.value(ctx) + self.value).min(self.max);
        ctx.variables.set(var.id, sum);
        Status::Success
    }
}

/// Subtracts a constant from a variable, clamping at `min`.
pub struct SubtractFloat {
    pub target: Option<VariableRef>,
    pub value: f32,
    pub min: f32,
}

impl Behavior<ExecContext> for SubtractFloat {
    fn tick(&self, ctx: &mut ExecContext) -> Status {
        let Some(var) = self.target else {
            return Status::Failure;
        };
        let difference = (var.value(ctx) - self.value).max(self.min);
        ctx.variables.set(var.id, difference);
        Status::Success
    }
}

/// Succeeds if a variable compares to a constant as configured.
pub struct TestFloat {
    pub target: Option<VariableRef>,
    pub mode: FloatTest,
    pub value: f32,
}

impl Behavior<ExecContext> for TestFloat {
    fn tick(&self, ctx: &mut ExecContext) -> Status {
        match self.target {
            Some(var) if self.mode.holds(var.value(ctx), self.value) => Status::Success,
            _ => Status::Failure,
        }
    }
}

/// Compiles the tree rooted at the `Behavior Tree` node `tree`.
pub fn compile_tree(graph: &NodeGraph, tree: NodeId) -> Result<BoxedBehavior> {
    let node = graph.get(tree)?;
    if !node.is_behavior_tree() {
        return Err(GraphError::WrongKind {
            id: tree,
            expected: "Behavior Tree",
            found: node.type_name(),
        });
    }

    let mut path = Vec::new();
    compile_node(graph, tree, &mut path)
}

fn compile_node(graph: &NodeGraph, id: NodeId, path: &mut Vec<NodeId>) -> Result<BoxedBehavior> {
    if path.contains(&id) {
        return Err(GraphError::Cycle(id));
    }

    let node = graph.get(id)?;
    let brand = node.brand();
    if !brand.is_executable() {
        return Err(GraphError::NotExecutable { id, brand });
    }

    path.push(id);
    let mut children = Vec::new();
    for child in graph.children(id) {
        let compiled = compile_node(graph, child, path)?;
        children.push(Box::new(Scoped::new(id, compiled)) as BoxedBehavior);
    }
    path.pop();

    let behavior: BoxedBehavior = match &node.kind {
        NodeKind::BehaviorTree { .. } => Box::new(TreeRoot::new(children)),
        NodeKind::Sequence => builder::sequence(children),
        NodeKind::Selector => builder::selector(children),
        NodeKind::Inverter => builder::inverter_all(children),
        NodeKind::AlwaysSucceed => builder::always_succeed_all(children),
        NodeKind::Restart => Box::new(Restart),
        NodeKind::SceneFinished => Box::new(SceneFinished),
        NodeKind::KeyDown { key_code } => Box::new(KeyDown {
            key_code: *key_code,
        }),
        NodeKind::ResetFloatVariable { variable } => Box::new(ResetFloat {
            target: VariableRef::resolve(graph, *variable),
        }),
        NodeKind::AddFloatVariable {
            variable,
            value,
            max,
        } => Box::new(AddFloat {
            target: VariableRef::resolve(graph, *variable),
            value: *value,
            max: *max,
        }),
        NodeKind::SubtractFloatVariable {
            variable,
            value,
            min,
        } => Box::new(SubtractFloat {
            target: VariableRef::resolve(graph, *variable),
            value: *value,
            min: *min,
        }),
        NodeKind::TestFloatVariable {
            variable,
            mode,
            value,
        } => Box::new(TestFloat {
            target: VariableRef::resolve(graph, *variable),
            mode: *mode,
            value: *value,
        }),
        // Containers and properties never sit inside a tree.
        other => {
            return Err(GraphError::WrongKind {
                id,
                expected: "behavior node",
                found: other.type_name(),
            });
        }
    };

    Ok(behavior)
}
