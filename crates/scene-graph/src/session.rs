//! Driving a game through execution passes.
//!
//! A [`Session`] is what the editor's play mode does with a graph: find the
//! `Game` node, compile its trees once, then execute the game once per frame
//! with that frame's input until the game finishes or a pass limit is hit.

use std::collections::HashMap;

use behavior_tree::Status;
use thiserror::Error;

use crate::config::SessionConfig;
use crate::context::{ExecContext, FloatVariables, InputState};
use crate::error::GraphError;
use crate::game::{AttachedTree, Game};
use crate::graph::NodeGraph;
use crate::node::{ExecuteMode, NodeId};

/// Errors raised while setting up or driving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("graph has no Game node")]
    MissingGame,

    #[error("no on-demand behavior tree named `{0}`")]
    UnknownTree(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub game: NodeId,
    pub passes: u64,
    pub finished: bool,
    pub has_run: Vec<NodeId>,
    pub last_status: Option<Status>,
    /// Final values of the graph's `Float Variable` nodes.
    pub variables: FloatVariables,
}

/// A running game.
pub struct Session {
    config: SessionConfig,
    game: Game,
    on_demand: HashMap<String, AttachedTree>,
    ctx: ExecContext,
    passes: u64,
    last_status: Option<Status>,
}

impl Session {
    /// Sets up execution for the first `Game` node of `graph`.
    pub fn start(graph: &NodeGraph, config: SessionConfig) -> Result<Self> {
        let game_id = graph
            .node_of_type("Game")
            .map(|n| n.id)
            .ok_or(SessionError::MissingGame)?;

        let game = Game::from_graph(graph, game_id, config.aggregation)?;

        let mut on_demand = HashMap::new();
        for tree in graph.behavior_trees_for(game_id) {
            let node = graph.get(tree)?;
            if node.execute_mode() != Some(ExecuteMode::OnDemand) {
                continue;
            }
            if on_demand.contains_key(&node.name) {
                tracing::warn!(
                    "skipping on-demand tree {}: name `{}` already taken",
                    tree,
                    node.name
                );
                continue;
            }
            on_demand.insert(node.name.clone(), AttachedTree::compile(graph, tree)?);
        }

        tracing::info!(
            "session started: game={} trees={} on_demand={} policy={}",
            game_id,
            game.trees().len(),
            on_demand.len(),
            config.aggregation
        );

        let mut ctx = ExecContext::new(game_id);
        ctx.variables = FloatVariables::from_graph(graph);

        Ok(Self {
            config,
            game,
            on_demand,
            ctx,
            passes: 0,
            last_status: None,
        })
    }

    /// Executes the game once with `input` as the frame's input.
    pub fn step(&mut self, input: InputState) -> Status {
        self.ctx.input = input;
        let status = self.game.execute(&mut self.ctx);
        self.passes += 1;
        self.last_status = Some(status);
        tracing::debug!("pass {} finished with {:?}", self.passes, status);
        status
    }

    /// Steps once per input frame until the frames run out, the pass limit
    /// is reached or, if configured, the game finishes.
    ///
    /// Returns the number of passes executed by this call.
    pub fn run<I>(&mut self, frames: I) -> u64
    where
        I: IntoIterator<Item = InputState>,
    {
        let mut executed = 0;
        for input in frames {
            if self.passes >= self.config.max_passes {
                tracing::debug!("pass limit {} reached", self.config.max_passes);
                break;
            }
            if self.config.stop_on_finish && self.ctx.root.finished {
                break;
            }
            self.step(input);
            executed += 1;
        }
        executed
    }

    /// Executes the on-demand tree called `name` once, with the game as parent.
    pub fn run_on_demand(&mut self, name: &str) -> Result<Status> {
        let tree = self
            .on_demand
            .get(name)
            .ok_or_else(|| SessionError::UnknownTree(name.to_string()))?;

        let game = self.game.id();
        let status = self.ctx.scoped(game, |ctx| tree.execute(ctx));
        tracing::debug!("on-demand tree `{}` returned {:?}", name, status);
        Ok(status)
    }

    /// Names of the on-demand trees, sorted.
    pub fn on_demand_trees(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.on_demand.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn context(&self) -> &ExecContext {
        &self.ctx
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn is_finished(&self) -> bool {
        self.ctx.root.finished
    }

    /// Ends the session and reports what happened.
    pub fn finish(self) -> SessionReport {
        let report = SessionReport {
            game: self.game.id(),
            passes: self.passes,
            finished: self.ctx.root.finished,
            has_run: self.ctx.root.has_run,
            last_status: self.last_status,
            variables: self.ctx.variables,
        };
        tracing::info!(
            "session finished: passes={} finished={}",
            report.passes,
            report.finished
        );
        report
    }
}
