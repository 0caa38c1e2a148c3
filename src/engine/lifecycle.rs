use crate::model::RequestStatus;

use super::EngineError;

/// Which side of the marketplace issued an action. The engine does not
/// authenticate callers; it only enforces what each role may do with the
/// actor it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Host,
    Guest,
}

/// Valid transitions: `pending → accepted` and `pending → declined`.
/// Both targets are terminal; re-opening a request is unsupported.
pub fn check_transition(from: RequestStatus, to: RequestStatus) -> Result<(), EngineError> {
    match (from, to) {
        (RequestStatus::Pending, RequestStatus::Accepted)
        | (RequestStatus::Pending, RequestStatus::Declined) => Ok(()),
        _ => Err(EngineError::InvalidTransition { from, to }),
    }
}

/// Only a host-side action may move a request out of `pending`; guests may
/// only create new requests.
pub fn authorize_transition(actor: Actor) -> Result<(), EngineError> {
    match actor {
        Actor::Host => Ok(()),
        Actor::Guest => Err(EngineError::NotHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RequestStatus::*;

    #[test]
    fn pending_can_be_accepted_or_declined() {
        assert!(check_transition(Pending, Accepted).is_ok());
        assert!(check_transition(Pending, Declined).is_ok());
    }

    #[test]
    fn pending_to_pending_is_invalid() {
        assert_eq!(
            check_transition(Pending, Pending),
            Err(EngineError::InvalidTransition { from: Pending, to: Pending })
        );
    }

    #[test]
    fn terminal_states_cannot_be_reopened() {
        assert!(matches!(
            check_transition(Declined, Pending),
            Err(EngineError::InvalidTransition { from: Declined, to: Pending })
        ));
        assert!(matches!(
            check_transition(Accepted, Pending),
            Err(EngineError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn terminal_states_cannot_swap() {
        assert!(check_transition(Accepted, Declined).is_err());
        assert!(check_transition(Declined, Accepted).is_err());
    }

    #[test]
    fn only_hosts_may_transition() {
        assert!(authorize_transition(Actor::Host).is_ok());
        assert_eq!(authorize_transition(Actor::Guest), Err(EngineError::NotHost));
    }
}
