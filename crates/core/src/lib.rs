//! Seagrape Core - Shared types library.
//!
//! This crate provides common types used across all Seagrape components:
//! - `store` - Client-side cart and wishlist state
//! - `cli` - Command-line tools for inspecting and driving a store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, line items, and money

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
