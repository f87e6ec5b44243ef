//! State machine trait for status enums.
//!
//! Gives lifecycle statuses (proposal review, notification delivery) one
//! vocabulary for legal transitions.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// ```ignore
/// let next = ProposalStatus::Pending.transition_to(ProposalStatus::Approved)?;
/// assert!(next.is_terminal());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Switch {
        Off,
        On,
        Burnt,
    }

    impl StateMachine for Switch {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Switch::Off => vec![Switch::On],
                Switch::On => vec![Switch::Off, Switch::Burnt],
                Switch::Burnt => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(Switch::Off.transition_to(Switch::On), Ok(Switch::On));
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let err = Switch::Off.transition_to(Switch::Burnt).unwrap_err();
        assert_eq!(err.field(), "state_transition");
    }

    #[test]
    fn terminal_state_has_no_exits() {
        assert!(Switch::Burnt.is_terminal());
        assert!(!Switch::On.is_terminal());
    }
}
