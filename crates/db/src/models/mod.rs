//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO for full-record replacement of editable fields

pub mod booking;
pub mod credential;
pub mod event;
pub mod inquiry;
pub mod listing;
pub mod owner;
pub mod review;
pub mod session;
pub mod support_ticket;
pub mod tenant;
pub mod user;
