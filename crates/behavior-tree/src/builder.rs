//! Builder utilities for ergonomic behavior tree construction.
//!
//! This module provides helper functions to reduce boilerplate when building
//! behavior trees. Instead of writing verbose `Box::new(Sequence::new(vec![...]))`,
//! you can use shorter functions like `sequence(vec![...])`.

use crate::{AlwaysSucceed, Behavior, Constant, Inverter, Selector, Sequence, Status};

/// Creates a sequence node.
///
/// Shorthand for `Box::new(Sequence::new(children))`.
#[inline]
pub fn sequence<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Sequence::new(children))
}

/// Creates a selector node.
///
/// Shorthand for `Box::new(Selector::new(children))`.
#[inline]
pub fn selector<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Selector::new(children))
}

/// Creates an inverter node over a single child.
///
/// Shorthand for `Box::new(Inverter::wrap(child))`.
#[inline]
pub fn inverter<C: 'static>(child: Box<dyn Behavior<C>>) -> Box<dyn Behavior<C>> {
    Box::new(Inverter::wrap(child))
}

/// Creates an always-succeed node over a single child.
///
/// Shorthand for `Box::new(AlwaysSucceed::wrap(child))`.
#[inline]
pub fn always_succeed<C: 'static>(child: Box<dyn Behavior<C>>) -> Box<dyn Behavior<C>> {
    Box::new(AlwaysSucceed::wrap(child))
}

/// Creates an inverter over any number of children.
#[inline]
pub fn inverter_all<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Inverter::new(children))
}

/// Creates an always-succeed node over any number of children.
#[inline]
pub fn always_succeed_all<C: 'static>(
    children: Vec<Box<dyn Behavior<C>>>,
) -> Box<dyn Behavior<C>> {
    Box::new(AlwaysSucceed::new(children))
}

/// Creates a leaf that always returns `status`.
#[inline]
pub fn constant<C: 'static>(status: Status) -> Box<dyn Behavior<C>> {
    Box::new(Constant(status))
}
