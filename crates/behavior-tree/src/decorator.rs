//! Result-rewriting nodes.
//!
//! A decorator runs every behavior hanging below it, in order, and reports a
//! rewritten form of the last one's status. Editors normally give a
//! decorator a single child, but saved projects may carry more, and none of
//! them is skipped. With nothing below it a decorator succeeds.

use crate::{Behavior, Status};

/// Flips `Success` and `Failure` of its last child.
///
/// `Running` is left as is (see [`Status::invert`]).
pub struct Inverter<C> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C> Inverter<C> {
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        Self { children }
    }

    /// Inverter over a single child.
    pub fn wrap(child: Box<dyn Behavior<C>>) -> Self {
        Self::new(vec![child])
    }
}

impl<C> Behavior<C> for Inverter<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        self.children
            .iter()
            .fold(Status::Success, |_, child| child.tick(ctx).invert())
    }
}

/// Runs its children for their side effects and succeeds.
pub struct AlwaysSucceed<C> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C> AlwaysSucceed<C> {
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        Self { children }
    }

    /// Always-succeed wrapper over a single child.
    pub fn wrap(child: Box<dyn Behavior<C>>) -> Self {
        Self::new(vec![child])
    }
}

impl<C> Behavior<C> for AlwaysSucceed<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            let _ = child.tick(ctx);
        }
        Status::Success
    }
}
