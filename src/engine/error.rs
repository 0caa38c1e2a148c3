use chrono::NaiveDate;
use ulid::Ulid;

use crate::model::RequestStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    NotFound(Ulid),
    AlreadyExists(Ulid),
    /// Availability was asked for without a selected villa. Distinct from
    /// "empty availability" — the caller must render a no-selection state.
    NoSelection,
    InvalidStay {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },
    /// Only a host-side action may move a request out of `pending`.
    NotHost,
    LimitExceeded(&'static str),
    Invalid(&'static str),
    /// The external snapshot source failed to deliver a collection.
    Source(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::AlreadyExists(id) => write!(f, "already exists: {id}"),
            EngineError::NoSelection => write!(f, "no villa selected"),
            EngineError::InvalidStay { check_in, check_out } => {
                write!(f, "check-in {check_in} must be before check-out {check_out}")
            }
            EngineError::InvalidTransition { from, to } => {
                write!(f, "invalid transition: {from} -> {to}")
            }
            EngineError::NotHost => {
                write!(f, "only a host may change a request status")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Invalid(msg) => write!(f, "invalid: {msg}"),
            EngineError::Source(e) => write!(f, "snapshot source error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
