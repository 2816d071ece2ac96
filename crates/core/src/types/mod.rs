//! Core types for Mainstreet Markets.
//!
//! This module provides the domain models shared by the session state layer
//! and its tests, plus type-safe wrappers for entity IDs.

pub mod cart;
pub mod id;
pub mod product;
pub mod profile;
pub mod wishlist;

pub use cart::{Cart, CartItem};
pub use id::*;
pub use product::Product;
pub use profile::{
    NotificationSettings, PaymentMethod, PaymentMethodInput, ProfilePatch, ShippingAddress,
    ShippingAddressInput, UserProfile,
};
pub use wishlist::WishlistEntry;
