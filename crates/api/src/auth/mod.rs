//! Authentication: tokens, password hashing, the identity provider and the
//! gateway that turns provider identities into marketplace users.

pub mod gateway;
pub mod jwt;
pub mod password;
pub mod provider;
pub mod session;
