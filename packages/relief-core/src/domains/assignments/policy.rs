use std::str::FromStr;

use super::error::{LedgerError, ParseLedgerEnumError};
use super::models::AssignmentStatus;

/// How status updates are checked before they are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any status may follow any other; last write wins
    #[default]
    Permissive,
    /// Enforce [`AssignmentStatus::can_transition_to`] and reject stale writes
    Strict,
}

impl TransitionPolicy {
    pub fn check(self, from: AssignmentStatus, to: AssignmentStatus) -> Result<(), LedgerError> {
        match self {
            TransitionPolicy::Permissive => Ok(()),
            TransitionPolicy::Strict if from.can_transition_to(to) => Ok(()),
            TransitionPolicy::Strict => Err(LedgerError::InvalidTransition { from, to }),
        }
    }

    /// Status the stored row must still have for the write to apply
    pub fn expected_status(self, current: AssignmentStatus) -> Option<AssignmentStatus> {
        match self {
            TransitionPolicy::Strict => Some(current),
            TransitionPolicy::Permissive => None,
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = ParseLedgerEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(TransitionPolicy::Strict),
            "permissive" => Ok(TransitionPolicy::Permissive),
            _ => Err(ParseLedgerEnumError {
                kind: "transition policy",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_rejects_skipping_ahead() {
        let err = TransitionPolicy::Strict
            .check(AssignmentStatus::Pending, AssignmentStatus::Completed)
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidTransition {
                from: AssignmentStatus::Pending,
                to: AssignmentStatus::Completed
            }
        ));
    }

    #[test]
    fn permissive_allows_everything() {
        for from in AssignmentStatus::ALL {
            for to in AssignmentStatus::ALL {
                assert!(TransitionPolicy::Permissive.check(from, to).is_ok());
            }
        }
    }

    #[test]
    fn default_accepts_any_move() {
        let policy = TransitionPolicy::default();
        assert_eq!(policy, TransitionPolicy::Permissive);
        assert!(policy
            .check(AssignmentStatus::Pending, AssignmentStatus::Completed)
            .is_ok());
        assert_eq!(policy.expected_status(AssignmentStatus::Pending), None);
    }

    #[test]
    fn parses_from_config_text() {
        assert_eq!("strict".parse::<TransitionPolicy>(), Ok(TransitionPolicy::Strict));
        assert_eq!(" Permissive".parse::<TransitionPolicy>(), Ok(TransitionPolicy::Permissive));
        assert!("loose".parse::<TransitionPolicy>().is_err());
    }
}
