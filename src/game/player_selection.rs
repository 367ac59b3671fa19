use thiserror::Error as ThisError;
use uuid::Uuid;

use crate::models::live_match::Match;
use crate::models::player::Player;

#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum SelectionError {
    #[error("Player {0} is not in the lineup")]
    NotInLineup(Uuid),
    #[error("Player {0} is already in the lineup")]
    AlreadyInLineup(Uuid),
    #[error("Player {0} is not active")]
    Inactive(Uuid),
}

/// Candidates for "player going off": the current lineup.
/// Also the pool for goal/card/injury/penalty/corner attribution.
pub fn outgoing_candidates(match_state: &Match) -> Vec<Player> {
    match_state.lineup.clone()
}

/// Step one of a substitution: the outgoing player has been picked.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubstitution {
    player_out: Player,
    lineup_ids: Vec<Uuid>,
}

/// Both players picked; ready for `MatchEventEngine::record_substitution`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionChoice {
    pub player_out: Player,
    pub player_in: Player,
}

pub struct SubstitutionSelection;

impl SubstitutionSelection {
    pub fn select_outgoing(match_state: &Match, player_out_id: Uuid) -> Result<PendingSubstitution, SelectionError> {
        let player_out = match_state
            .lineup
            .iter()
            .find(|p| p.id == player_out_id)
            .cloned()
            .ok_or(SelectionError::NotInLineup(player_out_id))?;

        Ok(PendingSubstitution {
            player_out,
            lineup_ids: match_state.lineup.iter().map(|p| p.id).collect(),
        })
    }
}

impl PendingSubstitution {
    pub fn player_out(&self) -> &Player {
        &self.player_out
    }

    /// Bench: active roster players who are not in the lineup.
    pub fn incoming_candidates(&self, roster: &[Player]) -> Vec<Player> {
        roster
            .iter()
            .filter(|p| p.active && !self.lineup_ids.contains(&p.id))
            .cloned()
            .collect()
    }

    pub fn select_incoming(self, player_in: Player) -> Result<SubstitutionChoice, SelectionError> {
        if self.lineup_ids.contains(&player_in.id) {
            return Err(SelectionError::AlreadyInLineup(player_in.id));
        }
        if !player_in.active {
            return Err(SelectionError::Inactive(player_in.id));
        }
        Ok(SubstitutionChoice {
            player_out: self.player_out,
            player_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::live_match::MatchStatus;

    fn match_with_lineup(lineup: Vec<Player>) -> Match {
        let now = Utc::now();
        Match {
            id: Uuid::new_v4(),
            home_team: "Nkoroi FC".to_string(),
            away_team: "Rivals".to_string(),
            home_score: 0,
            away_score: 0,
            status: MatchStatus::Live,
            current_minute: 55,
            venue: None,
            match_date: now,
            lineup,
            events: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_pools_are_disjoint() {
        let starter = Player::new("Otieno", Some(9), "FW");
        let bench = Player::new("Kamau", Some(14), "MF");
        let mut retired = Player::new("Mwangi", Some(3), "DF");
        retired.active = false;
        let m = match_with_lineup(vec![starter.clone()]);
        let roster = vec![starter.clone(), bench.clone(), retired];

        assert_eq!(outgoing_candidates(&m), vec![starter.clone()]);

        let pending = SubstitutionSelection::select_outgoing(&m, starter.id).unwrap();
        assert_eq!(pending.player_out(), &starter);
        assert_eq!(pending.incoming_candidates(&roster), vec![bench.clone()]);

        let choice = pending.select_incoming(bench.clone()).unwrap();
        assert_eq!(choice.player_out, starter);
        assert_eq!(choice.player_in, bench);
    }

    #[test]
    fn test_selection_rejects_wrong_pools() {
        let starter = Player::new("Otieno", Some(9), "FW");
        let other_starter = Player::new("Wanjiru", Some(7), "MF");
        let m = match_with_lineup(vec![starter.clone(), other_starter.clone()]);

        let outsider = Uuid::new_v4();
        assert_eq!(
            SubstitutionSelection::select_outgoing(&m, outsider),
            Err(SelectionError::NotInLineup(outsider))
        );

        let pending = SubstitutionSelection::select_outgoing(&m, starter.id).unwrap();
        assert_eq!(
            pending.clone().select_incoming(other_starter.clone()),
            Err(SelectionError::AlreadyInLineup(other_starter.id))
        );

        let mut inactive = Player::new("Mwangi", Some(3), "DF");
        inactive.active = false;
        assert_eq!(
            pending.select_incoming(inactive.clone()),
            Err(SelectionError::Inactive(inactive.id))
        );
    }
}
