//! Domain types and pure business rules for the Gharpayy rental marketplace.
//!
//! Nothing in this crate performs I/O. The `db` crate persists these types and
//! the `api` crate exposes them over HTTP.

pub mod booking;
pub mod error;
pub mod inventory;
pub mod listing;
pub mod rating;
pub mod roles;
pub mod ticket;
pub mod types;
pub mod validation;
