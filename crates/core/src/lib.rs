//! Mainstreet Core - Shared types library.
//!
//! This crate provides common types used across all Mainstreet Markets
//! components:
//! - `session` - Client-side session state layer (catalog, cart, wishlist,
//!   profile)
//! - `integration-tests` - End-to-end tests and the mock store server
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Domain models (products, carts, wishlists, profiles) and
//!   newtype wrappers for type-safe IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
