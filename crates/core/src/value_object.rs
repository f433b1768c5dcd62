//! Value object trait: equality by value, not identity.
//!
//! A value object has no identifier; two instances with the same attributes
//! are the same value. [`crate::Money`] and order lines are value objects,
//! catalog items and orders are not.

/// Marker trait for immutable values compared by their attributes.
///
/// To "modify" a value object, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
