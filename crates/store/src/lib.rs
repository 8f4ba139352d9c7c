//! Seagrape Store - client-side cart and wishlist state.
//!
//! This crate owns the storefront's tab-local state: the shopping cart and
//! the wishlist, each persisted as a JSON array under a fixed storage key and
//! kept in sync across tabs sharing the same storage.
//!
//! # Architecture
//!
//! - [`storage`] - the persistence layer: a [`storage::StorageBackend`]
//!   trait with in-memory and on-disk backends, plus the typed
//!   [`storage::PersistenceAdapter`] every store writes through
//! - [`cart`] - the cart store (line items, derived count/total)
//! - [`wishlist`] - the wishlist store (deduplicated product snapshots)
//! - [`context`] - [`StoreContext`], the per-tab composition root handed to
//!   UI code
//!
//! # Synchronization model
//!
//! Each store notifies its own tab through a `tokio::sync::watch` channel and
//! other tabs through the backend's change broadcast. Cross-tab conflict
//! resolution is last-writer-wins: a foreign write replaces a tab's state
//! wholesale on reload, with no merge.
//!
//! # Failure model
//!
//! Store operations never return errors and never panic. Missing or corrupt
//! storage degrades to an empty collection; out-of-range inputs are clamped
//! or ignored. Storage failures are logged and swallowed.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod context;
pub mod error;
pub mod storage;
pub mod wishlist;

pub use cart::CartStore;
pub use context::StoreContext;
pub use error::StorageError;
pub use storage::{
    CART_KEY, DiskStorage, MemoryStorage, PersistenceAdapter, StorageBackend, StorageEvent, TabId,
    WISHLIST_KEY,
};
pub use wishlist::WishlistStore;
