use thiserror::Error as ThisError;
use uuid::Uuid;

use crate::game::player_selection::SelectionError;
use crate::game::role_gate::OperationKind;
use crate::models::live_match::MatchStatus;
use crate::models::user::UserRole;

/// Failures of the match event engine. None of them leave partial state behind.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum MatchError {
    #[error("Role {role} may not {operation}")]
    Unauthorized { role: UserRole, operation: OperationKind },

    #[error("Cannot {operation} while match is {from}")]
    InvalidTransition { from: MatchStatus, operation: OperationKind },

    #[error("Minute {0} is outside 0-120")]
    InvalidMinute(i32),

    #[error("No goal to undo")]
    NoGoalToUndo,

    #[error("A player must be selected for {team}")]
    PlayerAttributionRequired { team: String },

    #[error("Team {0} is not playing in this match")]
    UnknownTeam(String),

    #[error("Player {0} is not in the lineup")]
    PlayerNotInLineup(Uuid),

    #[error("Invalid substitution: {0}")]
    InvalidSubstitution(String),

    #[error("Invalid lineup: {0}")]
    InvalidLineup(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<SelectionError> for MatchError {
    fn from(e: SelectionError) -> Self {
        MatchError::InvalidSubstitution(e.to_string())
    }
}
