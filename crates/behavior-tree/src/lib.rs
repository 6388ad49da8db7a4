//! Lightweight behavior tree library for scene-graph game logic.
//!
//! This library provides a minimal, deterministic behavior tree implementation
//! that the scene graph compiles its behavior nodes into.
//!
//! - **Synchronous ticks**: Every tick runs to completion on the caller's thread
//! - **Running yields**: Composites stop on it and report `Success` for the tick
//! - **Explicit aggregation**: Hosts running sibling trees pick an [`Aggregation`]
//! - **Minimal dependencies**: only `strum` for policy names
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait for all nodes
//! - [`Status`]: Success, Failure or Running
//! - Composite nodes: [`Sequence`], [`Selector`]
//! - Decorator nodes: [`Inverter`], [`AlwaysSucceed`]
//! - Leaves: [`Constant`]
//! - [`Aggregation`]: folding statuses of independent trees

pub mod aggregate;
pub mod behavior;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod status;

// Re-export core types for ergonomic API
pub use aggregate::Aggregation;
pub use behavior::{Behavior, Constant};
pub use composite::{Selector, Sequence};
pub use decorator::{AlwaysSucceed, Inverter};
pub use status::Status;
