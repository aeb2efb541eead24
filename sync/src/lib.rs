//! Scoped-list synchronization for user-owned records.
//!
//! Every page of the companion app manages "all records of one entity owned
//! by the current user": fetch on mount, render, and after any write go back
//! to the store for fresh ground truth. This crate implements that pattern
//! once: the [`state::ListState`] machine, the [`driver::ListSync`] driver
//! that sequences writes before reloads, the [`store::EntityStore`] seam the
//! hosted backend is consumed through, and the ambient [`session`] gate the
//! shell feeds with the resolved identity.
//!
//! The crate knows nothing about concrete entities; those live in `shared`.

pub mod cancel;
pub mod driver;
pub mod memory;
pub mod session;
pub mod state;
pub mod store;
pub mod views;

pub use cancel::CancelToken;
pub use driver::ListSync;
pub use session::{SessionHandle, UserId, UserIdentity};
pub use state::{ListEvent, ListState, Phase};
pub use store::{Direction, Entity, EntityStore, Filter, FilterValue, Immutable, Query, StoreError};
