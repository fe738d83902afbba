//! Deduplicated product lists.
//!
//! Both the wishlist and the compare list are a [`ProductSet`]: entries keyed
//! by product id, kept in insertion order, with an optional size bound. The
//! wrappers only differ in how they report the outcome of an add.

mod compare;
mod set;
mod wishlist;

pub use compare::{CompareList, DEFAULT_COMPARE_CAPACITY, ToggleAction, ToggleOutcome};
pub use set::{ProductSet, SetEntry, SetRecord};
pub use wishlist::Wishlist;
