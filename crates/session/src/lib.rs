//! Mainstreet Session - client-side session state layer.
//!
//! # Architecture
//!
//! UI collaborators (screens, forms) never talk to the network or the disk
//! directly. They call into [`state::SessionState`], which owns four
//! independent state containers:
//!
//! - [`state::CatalogState`] - remote product catalog plus a locally cached
//!   snapshot with synchronous search/filter/sort
//! - [`state::CartState`] - mirror of the server-resident cart (the server
//!   is the single source of truth; the mirror is replaced wholesale after
//!   every mutation)
//! - [`state::WishlistState`] - locally persisted product snapshots
//! - [`state::ProfileState`] - locally persisted user profile record
//!
//! Containers expose synchronous reads and asynchronous mutates. Every
//! operation catches its own failures: errors land in a per-container error
//! slot for the UI to render, never as a panic or an `Err` escaping the
//! facade boundary.
//!
//! # Example
//!
//! ```rust,ignore
//! use mainstreet_session::config::SessionConfig;
//! use mainstreet_session::state::SessionState;
//!
//! let config = SessionConfig::from_env()?;
//! let session = SessionState::new(config)?;
//! session.load().await;
//!
//! session.catalog().refresh().await;
//! let results = session.catalog().search("tote");
//!
//! if session.cart().add(results[0].id, 1).await {
//!     println!("in cart: {}", session.cart().cart().item_count());
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::SessionConfig;
pub use error::SessionError;
pub use state::SessionState;
