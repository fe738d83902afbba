//! Yasira Core - Shared domain types.
//!
//! This crate provides the types shared by:
//! - `storefront` - Cart, wishlist, compare list, checkout and session state
//! - `cli` - Command-line driver over file-backed state
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no clocks.
//! Everything here is plain data that can be copied by value into a
//! collection and serialized as-is.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, product snapshots and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
