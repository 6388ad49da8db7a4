//! Core behavior trait.
//!
//! This module defines the [`Behavior`] trait, which is the fundamental
//! abstraction for all behavior tree nodes. The trait is generic over a
//! context type `C`, so the same composites drive any kind of execution
//! context (a scene pass, a test harness, ...).

use crate::Status;

/// A behavior tree node that can be evaluated against a context.
pub trait Behavior<C>: Send + Sync {
    /// Evaluate this behavior node against the given context.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Mutable reference to the execution context. Nodes read the
    ///   frame's input from it and record their side effects in it.
    ///
    /// # Returns
    ///
    /// - `Status::Success` if the behavior succeeded
    /// - `Status::Failure` if the behavior failed
    /// - `Status::Running` if the behavior has not finished yet
    fn tick(&self, ctx: &mut C) -> Status;
}

/// Blanket implementation for boxed behaviors.
///
/// This allows `Box<dyn Behavior<C>>` to also implement `Behavior<C>`,
/// enabling dynamic dispatch and heterogeneous collections of nodes.
impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}

/// A leaf that always reports the same status.
///
/// Handy as a placeholder while a tree is being assembled.
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub Status);

impl<C> Behavior<C> for Constant {
    #[inline]
    fn tick(&self, _ctx: &mut C) -> Status {
        self.0
    }
}
