//! Error types raised while editing, compiling or loading a graph.

use thiserror::Error;

use crate::node::{Brand, NodeId};

/// Errors surfaced by [`NodeGraph`](crate::NodeGraph) operations.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {0} cannot be connected to itself")]
    SelfConnection(NodeId),

    #[error("node {id} ({type_name}) has no input terminal")]
    NotConnectable { id: NodeId, type_name: &'static str },

    #[error("node {id} ({type_name}) has no free output slot (capacity {capacity})")]
    SlotsExhausted {
        id: NodeId,
        type_name: &'static str,
        capacity: usize,
    },

    #[error("connection {from} -> {to} already exists")]
    DuplicateConnection { from: NodeId, to: NodeId },

    #[error("connecting {from} -> {to} would create a cycle")]
    WouldCycle { from: NodeId, to: NodeId },

    #[error("behavior cycle detected at node {0}")]
    Cycle(NodeId),

    #[error("node {id} ({type_name}) cannot hold members")]
    NotContainer { id: NodeId, type_name: &'static str },

    #[error("node {id} is a {brand} node and cannot be executed")]
    NotExecutable { id: NodeId, brand: Brand },

    #[error("node {id} is a {found}, expected a {expected}")]
    WrongKind {
        id: NodeId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("node id {0} is used more than once")]
    DuplicateId(NodeId),

    #[error("no node ids left to allocate")]
    IdsExhausted,

    #[error("node {from} references missing node {missing}")]
    DanglingReference { from: NodeId, missing: NodeId },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
