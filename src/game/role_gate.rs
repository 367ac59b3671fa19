use std::fmt;
use serde::{Deserialize, Serialize};

use crate::models::live_match::IncidentKind;
use crate::models::user::UserRole;

/// Everything a caller can ask of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    ViewMatch,
    ViewSummary,
    CreateMatch,
    SetLineup,
    ManageRoster,
    StartMatch,
    EndMatch,
    RecordGoal,
    UndoLastGoal,
    RecordCard,
    RecordSubstitution,
    RecordInjury,
    RecordPenalty,
    RecordCorner,
    RecordHalftime,
    SetMinute,
    IncrementMinute,
    DecrementMinute,
}

impl OperationKind {
    pub fn is_mutating(&self) -> bool {
        !matches!(self, OperationKind::ViewMatch | OperationKind::ViewSummary)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::ViewMatch => "view_match",
            OperationKind::ViewSummary => "view_summary",
            OperationKind::CreateMatch => "create_match",
            OperationKind::SetLineup => "set_lineup",
            OperationKind::ManageRoster => "manage_roster",
            OperationKind::StartMatch => "start_match",
            OperationKind::EndMatch => "end_match",
            OperationKind::RecordGoal => "record_goal",
            OperationKind::UndoLastGoal => "undo_last_goal",
            OperationKind::RecordCard => "record_card",
            OperationKind::RecordSubstitution => "record_substitution",
            OperationKind::RecordInjury => "record_injury",
            OperationKind::RecordPenalty => "record_penalty",
            OperationKind::RecordCorner => "record_corner",
            OperationKind::RecordHalftime => "record_halftime",
            OperationKind::SetMinute => "set_minute",
            OperationKind::IncrementMinute => "increment_minute",
            OperationKind::DecrementMinute => "decrement_minute",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<IncidentKind> for OperationKind {
    fn from(kind: IncidentKind) -> Self {
        match kind {
            IncidentKind::Injury => OperationKind::RecordInjury,
            IncidentKind::Penalty => OperationKind::RecordPenalty,
            IncidentKind::Corner => OperationKind::RecordCorner,
        }
    }
}

/// Authorization predicate for match operations.
///
/// Fans are read-only. Admins and super admins may perform every mutation;
/// the difference between the two only matters for user management, which
/// lives outside this service.
pub struct RoleGate;

impl RoleGate {
    pub fn allows(role: UserRole, operation: OperationKind) -> bool {
        if !operation.is_mutating() {
            return true;
        }
        role.is_operator()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUTATIONS: [OperationKind; 16] = [
        OperationKind::CreateMatch,
        OperationKind::SetLineup,
        OperationKind::ManageRoster,
        OperationKind::StartMatch,
        OperationKind::EndMatch,
        OperationKind::RecordGoal,
        OperationKind::UndoLastGoal,
        OperationKind::RecordCard,
        OperationKind::RecordSubstitution,
        OperationKind::RecordInjury,
        OperationKind::RecordPenalty,
        OperationKind::RecordCorner,
        OperationKind::RecordHalftime,
        OperationKind::SetMinute,
        OperationKind::IncrementMinute,
        OperationKind::DecrementMinute,
    ];

    #[test]
    fn test_fans_are_read_only() {
        for op in MUTATIONS {
            assert!(!RoleGate::allows(UserRole::Fan, op), "fan must not {}", op);
        }
        assert!(RoleGate::allows(UserRole::Fan, OperationKind::ViewMatch));
        assert!(RoleGate::allows(UserRole::Fan, OperationKind::ViewSummary));
    }

    #[test]
    fn test_operators_may_mutate() {
        for op in MUTATIONS {
            assert!(RoleGate::allows(UserRole::Admin, op));
            assert!(RoleGate::allows(UserRole::SuperAdmin, op));
        }
    }
}
