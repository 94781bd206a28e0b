//! User roles.
//!
//! A role is fixed when the account is created. Every place that behaves
//! differently per role matches on [`Role`] exhaustively.

use crate::types::define_text_enum;

define_text_enum! {
    /// The three kinds of account on the marketplace.
    Role ("role") {
        /// Searches, books, reviews and favorites listings.
        Tenant = "tenant",
        /// Publishes listings and manages bookings on them.
        Owner = "owner",
        /// Moderates listings, owners and support tickets.
        Admin = "admin",
    }
}

/// The role-specific profile stored next to a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Tenant,
    Owner,
}

impl Role {
    /// Which profile row (if any) is created alongside the user at sign-up.
    pub fn profile_kind(self) -> Option<ProfileKind> {
        match self {
            Role::Tenant => Some(ProfileKind::Tenant),
            Role::Owner => Some(ProfileKind::Owner),
            Role::Admin => None,
        }
    }

    /// Whether an anonymous caller may create an account with this role.
    ///
    /// Admin accounts are only created by other admins.
    pub fn is_self_service(self) -> bool {
        match self {
            Role::Tenant | Role::Owner => true,
            Role::Admin => false,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Role::Tenant => "Tenant",
            Role::Owner => "PG Owner",
            Role::Admin => "Admin",
        }
    }
}
