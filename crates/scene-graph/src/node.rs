//! Scene-graph nodes.
//!
//! Every vertex of the editor graph is a [`Node`]: a handful of fields shared
//! by all nodes plus a [`NodeKind`] carrying the variant-specific data. The
//! kind is serialized inline next to the shared fields and tagged by a `type`
//! field, so a saved node reads like:
//!
//! ```json
//! { "id": 1, "name": "Game", "position": [50.0, 50.0],
//!   "minimum_size": [260.0, 220.0], "subset": [2], "type": "Game" }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default layout size of a node without a preview.
pub const NODE_MINIMUM_SIZE: [f32; 2] = [230.0, 65.0];

/// Layout size of nodes that render a preview (Game, Scene, Object).
pub const NODE_WITH_PREVIEW_SIZE: [f32; 2] = [260.0, 220.0];

/// Default editor position of a freshly created node.
pub const DEFAULT_POSITION: [f32; 2] = [50.0, 50.0];

/// Number of output terminals on `Sequence` and `Selector` nodes.
pub const COMPOSITE_SLOTS: usize = 5;

/// Stable identity of a node within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Broad role of a node in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Brand {
    /// Carries configuration, never executed.
    Property,
    /// Action, condition or composite of a behavior tree.
    Behavior,
    /// Executable node with side effects on the pass (e.g. finishing a scene).
    Function,
    /// Reads or writes a variable when executed inside a tree.
    Arithmetic,
}

impl Brand {
    /// Returns `true` for brands that may appear inside a behavior tree.
    pub fn is_executable(self) -> bool {
        matches!(self, Brand::Behavior | Brand::Function | Brand::Arithmetic)
    }
}

/// When a behavior tree runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecuteMode {
    /// Executed on every pass of its owner.
    #[default]
    Always,
    /// Executed only when explicitly requested by name.
    #[serde(rename = "On Demand")]
    OnDemand,
}

/// Screen orientation of the iPad platform target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Comparison made by a `Test Float Variable` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FloatTest {
    #[default]
    #[serde(rename = "Equal To")]
    EqualTo,
    #[serde(rename = "Smaller As")]
    LessThan,
    #[serde(rename = "Bigger As")]
    GreaterThan,
}

impl FloatTest {
    /// Returns `true` if `value` compares to `operand` as required.
    pub fn holds(self, value: f32, operand: f32) -> bool {
        match self {
            FloatTest::EqualTo => value == operand,
            FloatTest::LessThan => value < operand,
            FloatTest::GreaterThan => value > operand,
        }
    }
}

/// Variant-specific data of a node, discriminated by the `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Game,
    Scene,
    Object,
    #[serde(rename = "Behavior Tree")]
    BehaviorTree {
        #[serde(default)]
        execute: ExecuteMode,
        #[serde(default = "default_tree_scale")]
        tree_scale: f32,
    },
    Sequence,
    Selector,
    Inverter,
    #[serde(rename = "Always Succeed")]
    AlwaysSucceed,
    Restart,
    #[serde(rename = "Scene Finished")]
    SceneFinished,
    #[serde(rename = "Key Down")]
    KeyDown { key_code: u16 },
    #[serde(rename = "Float Variable")]
    FloatVariable {
        /// Value the variable starts with and returns to on reset.
        #[serde(default)]
        default_value: f32,
    },
    /// The arithmetic kinds below act on the `Float Variable` named by
    /// `variable` and fail when it is unset.
    #[serde(rename = "Reset Float Variable")]
    ResetFloatVariable {
        #[serde(default)]
        variable: Option<NodeId>,
    },
    #[serde(rename = "Add Float Variable")]
    AddFloatVariable {
        #[serde(default)]
        variable: Option<NodeId>,
        #[serde(default = "default_step")]
        value: f32,
        #[serde(default = "default_max")]
        max: f32,
    },
    #[serde(rename = "Subtract Float Variable")]
    SubtractFloatVariable {
        #[serde(default)]
        variable: Option<NodeId>,
        #[serde(default = "default_step")]
        value: f32,
        #[serde(default)]
        min: f32,
    },
    #[serde(rename = "Test Float Variable")]
    TestFloatVariable {
        #[serde(default)]
        variable: Option<NodeId>,
        #[serde(default)]
        mode: FloatTest,
        #[serde(default = "default_step")]
        value: f32,
    },
    #[serde(rename = "Platform OSX")]
    PlatformOsx { width: u32, height: u32 },
    #[serde(rename = "Platform IPAD")]
    PlatformIpad {
        /// Index into the supported resolutions (1536x2048, 2048x2732).
        model: u8,
        orientation: Orientation,
    },
}

fn default_tree_scale() -> f32 {
    1.0
}

fn default_step() -> f32 {
    1.0
}

fn default_max() -> f32 {
    100.0
}

impl NodeKind {
    /// A behavior tree root executed on every pass.
    pub fn behavior_tree() -> Self {
        NodeKind::BehaviorTree {
            execute: ExecuteMode::Always,
            tree_scale: default_tree_scale(),
        }
    }

    /// A behavior tree root executed only on request.
    pub fn on_demand_tree() -> Self {
        NodeKind::BehaviorTree {
            execute: ExecuteMode::OnDemand,
            tree_scale: default_tree_scale(),
        }
    }

    /// The serialized discriminator of this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Game => "Game",
            NodeKind::Scene => "Scene",
            NodeKind::Object => "Object",
            NodeKind::BehaviorTree { .. } => "Behavior Tree",
            NodeKind::Sequence => "Sequence",
            NodeKind::Selector => "Selector",
            NodeKind::Inverter => "Inverter",
            NodeKind::AlwaysSucceed => "Always Succeed",
            NodeKind::Restart => "Restart",
            NodeKind::SceneFinished => "Scene Finished",
            NodeKind::KeyDown { .. } => "Key Down",
            NodeKind::FloatVariable { .. } => "Float Variable",
            NodeKind::ResetFloatVariable { .. } => "Reset Float Variable",
            NodeKind::AddFloatVariable { .. } => "Add Float Variable",
            NodeKind::SubtractFloatVariable { .. } => "Subtract Float Variable",
            NodeKind::TestFloatVariable { .. } => "Test Float Variable",
            NodeKind::PlatformOsx { .. } => "Platform OSX",
            NodeKind::PlatformIpad { .. } => "Platform IPAD",
        }
    }

    /// Name given to new nodes of this kind.
    pub fn default_name(&self) -> &'static str {
        match self {
            NodeKind::SceneFinished => "Finished",
            NodeKind::FloatVariable { .. } => "Float",
            NodeKind::ResetFloatVariable { .. } => "Reset Float",
            NodeKind::AddFloatVariable { .. } => "Const Plus Float",
            NodeKind::SubtractFloatVariable { .. } => "Float Minus Const",
            NodeKind::TestFloatVariable { .. } => "Test Float",
            NodeKind::PlatformOsx { .. } => "Platform: OSX",
            NodeKind::PlatformIpad { .. } => "Platform: iPAD",
            other => other.type_name(),
        }
    }

    pub fn brand(&self) -> Brand {
        match self {
            NodeKind::PlatformOsx { .. }
            | NodeKind::PlatformIpad { .. }
            | NodeKind::FloatVariable { .. } => Brand::Property,
            NodeKind::SceneFinished => Brand::Function,
            NodeKind::ResetFloatVariable { .. }
            | NodeKind::AddFloatVariable { .. }
            | NodeKind::SubtractFloatVariable { .. }
            | NodeKind::TestFloatVariable { .. } => Brand::Arithmetic,
            _ => Brand::Behavior,
        }
    }

    /// Container nodes own a subset of member nodes and host behavior trees.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Game | NodeKind::Scene | NodeKind::Object)
    }

    /// Returns `true` if the node has an input terminal, i.e. it can be the
    /// child end of a behavior connection.
    pub fn has_input(&self) -> bool {
        !self.is_container()
            && !matches!(self, NodeKind::BehaviorTree { .. })
            && self.brand() != Brand::Property
    }

    /// The `Float Variable` an arithmetic node acts on.
    pub fn variable(&self) -> Option<NodeId> {
        match *self {
            NodeKind::ResetFloatVariable { variable }
            | NodeKind::AddFloatVariable { variable, .. }
            | NodeKind::SubtractFloatVariable { variable, .. }
            | NodeKind::TestFloatVariable { variable, .. } => variable,
            _ => None,
        }
    }

    /// Mutable access to the variable target, `None` for kinds without one.
    pub fn variable_mut(&mut self) -> Option<&mut Option<NodeId>> {
        match self {
            NodeKind::ResetFloatVariable { variable }
            | NodeKind::AddFloatVariable { variable, .. }
            | NodeKind::SubtractFloatVariable { variable, .. }
            | NodeKind::TestFloatVariable { variable, .. } => Some(variable),
            _ => None,
        }
    }

    /// Maximum number of behavior children, `None` meaning unbounded.
    pub fn child_capacity(&self) -> Option<usize> {
        match self {
            NodeKind::BehaviorTree { .. } => None,
            NodeKind::Sequence | NodeKind::Selector => Some(COMPOSITE_SLOTS),
            NodeKind::Inverter | NodeKind::AlwaysSucceed => Some(1),
            _ => Some(0),
        }
    }

    fn minimum_size(&self) -> [f32; 2] {
        if self.is_container() {
            NODE_WITH_PREVIEW_SIZE
        } else {
            NODE_MINIMUM_SIZE
        }
    }
}

/// A vertex of the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(default = "default_position")]
    pub position: [f32; 2],
    #[serde(default = "default_minimum_size")]
    pub minimum_size: [f32; 2],
    /// Ordered member list. Present only on container nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subset: Option<Vec<NodeId>>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

fn default_position() -> [f32; 2] {
    DEFAULT_POSITION
}

fn default_minimum_size() -> [f32; 2] {
    NODE_MINIMUM_SIZE
}

impl Node {
    /// Creates a node of the given kind with its default name and layout.
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        let subset = kind.is_container().then(Vec::new);
        Self {
            id,
            name: kind.default_name().to_string(),
            position: DEFAULT_POSITION,
            minimum_size: kind.minimum_size(),
            subset,
            kind,
        }
    }

    /// Overrides the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the editor position.
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    #[inline]
    pub fn brand(&self) -> Brand {
        self.kind.brand()
    }

    /// Members of a container node, empty for everything else.
    pub fn members(&self) -> &[NodeId] {
        self.subset.as_deref().unwrap_or(&[])
    }

    /// Returns `true` if this is a behavior tree root.
    pub fn is_behavior_tree(&self) -> bool {
        matches!(self.kind, NodeKind::BehaviorTree { .. })
    }

    /// Execution mode of a behavior tree root, `None` for other kinds.
    pub fn execute_mode(&self) -> Option<ExecuteMode> {
        match self.kind {
            NodeKind::BehaviorTree { execute, .. } => Some(execute),
            _ => None,
        }
    }
}
