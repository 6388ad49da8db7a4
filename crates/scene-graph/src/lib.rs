//! Scene graph and behavior execution for Shape-Z projects.
//!
//! A project is a [`NodeGraph`]: an arena of [`Node`]s linked by id. Behavior
//! trees are edited as nodes and connections, compiled into
//! [`behavior_tree`] trait objects, and executed by the [`Game`] node once
//! per pass. A [`Session`] drives those passes.
//!
//! Modules are organized by responsibility:
//! - [`node`] and [`graph`] hold the data model and its JSON form
//! - [`compile`] turns behavior nodes into executable behaviors
//! - [`context`] is the per-pass execution context
//! - [`game`] is the dispatcher fanning a pass out to attached trees
//! - [`session`] and [`config`] drive passes for a whole game
pub mod compile;
pub mod config;
pub mod context;
pub mod error;
pub mod game;
pub mod graph;
pub mod node;
pub mod session;

pub use behavior_tree::{Aggregation, Behavior, Status};
pub use compile::{BoxedBehavior, VariableRef, compile_tree};
pub use config::SessionConfig;
pub use context::{BehaviorTreeRoot, ExecContext, FloatVariables, InputState};
pub use error::{GraphError, Result};
pub use game::{AttachedTree, Game};
pub use graph::{Connection, NodeGraph};
pub use node::{Brand, ExecuteMode, FloatTest, Node, NodeId, NodeKind, Orientation};
pub use session::{Session, SessionError, SessionReport};
