//! Support ticket vocabulary and status progression.

use crate::error::CoreError;
use crate::types::define_text_enum;

define_text_enum! {
    SupportCategory ("ticket category") {
        Technical = "technical",
        Billing = "billing",
        General = "general",
        Abuse = "abuse",
    }
}

define_text_enum! {
    SupportPriority ("ticket priority") {
        Low = "low",
        Medium = "medium",
        High = "high",
    }
}

define_text_enum! {
    /// Ticket status. Only ever moves forward.
    TicketStatus ("ticket status") {
        Open = "open",
        InProgress = "in_progress",
        Resolved = "resolved",
    }
}

impl TicketStatus {
    fn rank(self) -> u8 {
        match self {
            TicketStatus::Open => 0,
            TicketStatus::InProgress => 1,
            TicketStatus::Resolved => 2,
        }
    }

    /// `resolved` is final: every change after it, including re-resolving,
    /// is rejected.
    pub fn transition(self, to: TicketStatus) -> Result<(), CoreError> {
        if to.rank() > self.rank() {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                entity: "support ticket",
                from: self.as_str(),
                to: to.as_str(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use TicketStatus::*;

    #[test]
    fn text_values() {
        assert_eq!(InProgress.as_str(), "in_progress");
        assert_eq!("abuse".parse::<SupportCategory>().unwrap(), SupportCategory::Abuse);
        assert_eq!("high".parse::<SupportPriority>().unwrap(), SupportPriority::High);
    }

    #[test]
    fn open_to_in_progress_to_resolved() {
        assert!(Open.transition(InProgress).is_ok());
        assert!(InProgress.transition(Resolved).is_ok());
        assert!(Open.transition(Resolved).is_ok());
    }

    #[test]
    fn nothing_moves_after_resolved() {
        for to in TicketStatus::ALL {
            assert_matches!(
                Resolved.transition(*to),
                Err(CoreError::InvalidTransition { entity: "support ticket", .. })
            );
        }
    }

    #[test]
    fn backwards_and_same_state_are_rejected() {
        assert!(InProgress.transition(Open).is_err());
        assert!(Open.transition(Open).is_err());
        assert!(InProgress.transition(InProgress).is_err());
    }
}
