pub mod admin;
pub mod auth;
pub mod booking;
pub mod favorite;
pub mod inquiry;
pub mod listing;
pub mod review;
pub mod support_ticket;
pub mod user;
