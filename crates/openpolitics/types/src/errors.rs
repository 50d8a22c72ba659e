//! Error types for the civic-coordination core
//!
//! Every failure carries a stable machine-checkable [`ErrorKind`] plus a
//! human-readable message. All checks run synchronously before mutation;
//! no operation partially applies except the documented compensating
//! rollback in alliance creation.

use crate::{AllianceId, PartyId, QuestionId, UserId};

/// Errors that can occur in civic-coordination operations
#[derive(Debug, thiserror::Error)]
pub enum CivicError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Issue text invalid: {0}")]
    IssueTextInvalid(String),

    #[error("Pincode invalid: {0}")]
    PincodeInvalid(String),

    #[error("Text required: {0}")]
    TextRequired(&'static str),

    #[error("Party not found: {0}")]
    PartyNotFound(PartyId),

    #[error("Alliance not found: {0}")]
    AllianceNotFound(AllianceId),

    #[error("Question not found: {0}")]
    QuestionNotFound(QuestionId),

    #[error("User {user} is not an active member of party {party}")]
    NotAMember { party: PartyId, user: UserId },

    #[error("Vote target {user} is not an active member of party {party}")]
    TargetNotMember { party: PartyId, user: UserId },

    #[error("No active trust vote from {user} in party {party}")]
    NoActiveVote { party: PartyId, user: UserId },

    #[error("User {0} already has an active party membership")]
    AlreadyMember(UserId),

    #[error("Party {0} already has an active alliance membership")]
    AlreadyAllied(PartyId),

    #[error("Alliance {alliance} has no active membership for party {party}")]
    NotInAlliance { alliance: AllianceId, party: PartyId },

    #[error("Alliance {0} is already disbanded")]
    AllianceDisbanded(AllianceId),

    #[error("At least {required} distinct parties are required, got {provided}")]
    TooFewParties { required: usize, provided: usize },

    #[error("Party {0} is already merged; demerge first")]
    AlreadyMerged(PartyId),

    #[error("Party {0} cannot merge into itself")]
    SelfMerge(PartyId),

    #[error("Merging {child} into {parent} would create a cycle")]
    CycleDetected { child: PartyId, parent: PartyId },

    #[error("Party {0} is not merged")]
    NotMerged(PartyId),

    #[error("Store dependency failure: {0}")]
    Dependency(String),
}

/// Stable machine-checkable classification of a [`CivicError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No actor, or an actor without the required standing
    Unauthorized,
    /// Malformed input: text length, pincode format, missing field
    ValidationFailed,
    /// A uniqueness invariant would be violated
    Conflict,
    /// A referenced entity is absent
    NotFound,
    /// The operation is invalid in the current state
    InvalidOperation,
    /// The backing store failed or rejected the statement
    Dependency,
}

impl CivicError {
    /// The stable kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CivicError::Unauthorized(_) => ErrorKind::Unauthorized,
            CivicError::NotAMember { .. } => ErrorKind::Unauthorized,

            CivicError::IssueTextInvalid(_)
            | CivicError::PincodeInvalid(_)
            | CivicError::TextRequired(_) => ErrorKind::ValidationFailed,

            CivicError::AlreadyMember(_)
            | CivicError::AlreadyAllied(_)
            | CivicError::AlreadyMerged(_) => ErrorKind::Conflict,

            CivicError::PartyNotFound(_)
            | CivicError::AllianceNotFound(_)
            | CivicError::QuestionNotFound(_)
            | CivicError::NoActiveVote { .. }
            | CivicError::NotInAlliance { .. } => ErrorKind::NotFound,

            CivicError::TargetNotMember { .. }
            | CivicError::AllianceDisbanded(_)
            | CivicError::TooFewParties { .. }
            | CivicError::SelfMerge(_)
            | CivicError::CycleDetected { .. }
            | CivicError::NotMerged(_) => ErrorKind::InvalidOperation,

            CivicError::Dependency(_) => ErrorKind::Dependency,
        }
    }
}

/// Result type alias for civic operations
pub type CivicResult<T> = Result<T, CivicError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_stable() {
        let party = PartyId::new("p1");
        let user = UserId::new("u1");

        assert_eq!(
            CivicError::AlreadyMerged(party.clone()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            CivicError::NotMerged(party.clone()).kind(),
            ErrorKind::InvalidOperation
        );
        assert_eq!(
            CivicError::CycleDetected {
                child: party.clone(),
                parent: PartyId::new("p2"),
            }
            .kind(),
            ErrorKind::InvalidOperation
        );
        assert_eq!(
            CivicError::NotAMember { party, user }.kind(),
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn test_messages_are_human_readable() {
        let err = CivicError::TooFewParties {
            required: 2,
            provided: 1,
        };
        assert!(err.to_string().contains("At least 2"));

        let err = CivicError::NotInAlliance {
            alliance: AllianceId::new("coalition-1"),
            party: PartyId::new("p1"),
        };
        assert!(err.to_string().starts_with("Alliance coalition-1"));
    }
}
