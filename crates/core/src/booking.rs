//! Booking lifecycle.
//!
//! ```text
//! pending ──► confirmed ──► active ──► completed
//!    │            │            │
//!    └────────────┴────────────┴──► cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal. Entering either one gives the
//! booked room back to the listing.

use crate::error::CoreError;
use crate::inventory::RELEASE_ROOM;
use crate::roles::Role;
use crate::types::{define_text_enum, Date};

define_text_enum! {
    /// Status of a booking.
    BookingStatus ("booking status") {
        /// Just created; the room is already held.
        Pending = "pending",
        /// The owner accepted the booking.
        Confirmed = "confirmed",
        /// The tenant has moved in.
        Active = "active",
        /// The stay ended.
        Completed = "completed",
        /// Withdrawn by the tenant or declined by the owner.
        Cancelled = "cancelled",
    }
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Whether the booking currently occupies one of the listing's rooms.
    pub fn holds_room(self) -> bool {
        !self.is_terminal()
    }

    pub fn can_transition_to(self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        match (self, to) {
            (Pending, Confirmed) | (Confirmed, Active) | (Active, Completed) => true,
            (Pending | Confirmed | Active, Cancelled) => true,
            _ => false,
        }
    }

    /// Validate a transition and return the room delta it implies.
    ///
    /// `Some(RELEASE_ROOM)` when the booking stops holding its room.
    pub fn transition(self, to: BookingStatus) -> Result<Option<i32>, CoreError> {
        if !self.can_transition_to(to) {
            return Err(CoreError::InvalidTransition {
                entity: "booking",
                from: self.as_str(),
                to: to.as_str(),
            });
        }
        Ok((self.holds_room() && !to.holds_room()).then_some(RELEASE_ROOM))
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Active => "Active",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

/// How the caller relates to the booking being changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingParty {
    /// The tenant who made the booking.
    Tenant,
    /// The owner of the booked listing.
    Owner,
    /// An administrator.
    Admin,
    /// Anyone else.
    Unrelated,
}

impl BookingParty {
    pub fn resolve(role: Role, is_booking_tenant: bool, is_listing_owner: bool) -> Self {
        match role {
            Role::Admin => BookingParty::Admin,
            Role::Tenant if is_booking_tenant => BookingParty::Tenant,
            Role::Owner if is_listing_owner => BookingParty::Owner,
            Role::Tenant | Role::Owner => BookingParty::Unrelated,
        }
    }

    pub fn can_view(self) -> bool {
        !matches!(self, BookingParty::Unrelated)
    }
}

/// Check that `party` may move a booking into `to`.
///
/// Tenants may only cancel. Owners drive the rest of the lifecycle.
pub fn authorize_transition(party: BookingParty, to: BookingStatus) -> Result<(), CoreError> {
    let allowed = match party {
        BookingParty::Admin => true,
        BookingParty::Owner => to != BookingStatus::Pending,
        BookingParty::Tenant => to == BookingStatus::Cancelled,
        BookingParty::Unrelated => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Not allowed to mark this booking as {to}"
        )))
    }
}

/// Check-out, when given, must come after check-in.
pub fn validate_stay_dates(check_in: Date, check_out: Option<Date>) -> Result<(), CoreError> {
    match check_out {
        Some(out) if out <= check_in => Err(CoreError::Validation(
            "check_out_date must be after check_in_date".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use BookingStatus::*;

    #[test]
    fn forward_path_is_allowed() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Active));
        assert!(Active.can_transition_to(Completed));
    }

    #[test]
    fn any_non_terminal_state_can_cancel() {
        for from in [Pending, Confirmed, Active] {
            assert!(from.can_transition_to(Cancelled), "{from} -> cancelled");
        }
    }

    #[test]
    fn terminal_states_are_final() {
        for from in [Completed, Cancelled] {
            for to in BookingStatus::ALL {
                assert!(!from.can_transition_to(*to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn skipping_and_reversing_are_rejected() {
        assert!(!Pending.can_transition_to(Active));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Active.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn leaving_the_lifecycle_releases_the_room() {
        assert_eq!(Pending.transition(Cancelled).unwrap(), Some(RELEASE_ROOM));
        assert_eq!(Confirmed.transition(Cancelled).unwrap(), Some(RELEASE_ROOM));
        assert_eq!(Active.transition(Cancelled).unwrap(), Some(RELEASE_ROOM));
        assert_eq!(Active.transition(Completed).unwrap(), Some(RELEASE_ROOM));
    }

    #[test]
    fn progressing_keeps_the_room() {
        assert_eq!(Pending.transition(Confirmed).unwrap(), None);
        assert_eq!(Confirmed.transition(Active).unwrap(), None);
    }

    #[test]
    fn invalid_transition_error_names_both_states() {
        let err = Cancelled.transition(Confirmed).unwrap_err();
        assert_matches!(
            err,
            CoreError::InvalidTransition { entity: "booking", from: "cancelled", to: "confirmed" }
        );
    }

    #[test]
    fn party_resolution() {
        assert_eq!(BookingParty::resolve(Role::Admin, false, false), BookingParty::Admin);
        assert_eq!(BookingParty::resolve(Role::Tenant, true, false), BookingParty::Tenant);
        assert_eq!(BookingParty::resolve(Role::Tenant, false, false), BookingParty::Unrelated);
        assert_eq!(BookingParty::resolve(Role::Owner, false, true), BookingParty::Owner);
        assert_eq!(BookingParty::resolve(Role::Owner, true, false), BookingParty::Unrelated);
        assert!(!BookingParty::Unrelated.can_view());
    }

    #[test]
    fn tenants_may_only_cancel() {
        assert!(authorize_transition(BookingParty::Tenant, Cancelled).is_ok());
        assert_matches!(
            authorize_transition(BookingParty::Tenant, Confirmed),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn owners_drive_the_lifecycle() {
        for to in [Confirmed, Active, Completed, Cancelled] {
            assert!(authorize_transition(BookingParty::Owner, to).is_ok());
        }
        assert!(authorize_transition(BookingParty::Unrelated, Cancelled).is_err());
        assert!(authorize_transition(BookingParty::Admin, Completed).is_ok());
    }

    #[test]
    fn stay_dates() {
        let day = |d| Date::from_ymd_opt(2026, 1, d).unwrap();
        assert!(validate_stay_dates(day(1), None).is_ok());
        assert!(validate_stay_dates(day(1), Some(day(31))).is_ok());
        assert!(validate_stay_dates(day(5), Some(day(5))).is_err());
        assert!(validate_stay_dates(day(5), Some(day(4))).is_err());
    }
}
