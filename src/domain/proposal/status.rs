//! Review status of an edit proposal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Approved => "approved",
            ProposalStatus::Rejected => "rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ProposalStatus::Pending)
    }
}

impl StateMachine for ProposalStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (ProposalStatus::Pending, ProposalStatus::Approved)
                | (ProposalStatus::Pending, ProposalStatus::Rejected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ProposalStatus::Pending => vec![ProposalStatus::Approved, ProposalStatus::Rejected],
            ProposalStatus::Approved | ProposalStatus::Rejected => vec![],
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProposalStatus::Pending),
            "approved" => Ok(ProposalStatus::Approved),
            "rejected" => Ok(ProposalStatus::Rejected),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown proposal status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_reach_both_terminal_states() {
        assert!(ProposalStatus::Pending.can_transition_to(&ProposalStatus::Approved));
        assert!(ProposalStatus::Pending.can_transition_to(&ProposalStatus::Rejected));
        assert!(!ProposalStatus::Pending.is_terminal());
    }

    #[test]
    fn terminal_states_never_transition() {
        for terminal in [ProposalStatus::Approved, ProposalStatus::Rejected] {
            assert!(terminal.is_terminal());
            for target in [
                ProposalStatus::Pending,
                ProposalStatus::Approved,
                ProposalStatus::Rejected,
            ] {
                assert!(terminal.transition_to(target).is_err());
            }
        }
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("approved".parse::<ProposalStatus>().unwrap(), ProposalStatus::Approved);
        assert!("merged".parse::<ProposalStatus>().is_err());
    }
}
