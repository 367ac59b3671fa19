use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::player::Player;
use crate::utils::event_log::deserialize_event_log;

pub const MAX_MINUTE: u8 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Upcoming,
    Live,
    Finished,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MatchStatus {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "live" => Ok(Self::Live),
            "finished" => Ok(Self::Finished),
            other => Err(format!("{} is not a valid match status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchEventType {
    Kickoff,
    Goal,
    YellowCard,
    RedCard,
    Substitution,
    Injury,
    Penalty,
    Corner,
    Halftime,
    Fulltime,
}

impl MatchEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchEventType::Kickoff => "kickoff",
            MatchEventType::Goal => "goal",
            MatchEventType::YellowCard => "yellow_card",
            MatchEventType::RedCard => "red_card",
            MatchEventType::Substitution => "substitution",
            MatchEventType::Injury => "injury",
            MatchEventType::Penalty => "penalty",
            MatchEventType::Corner => "corner",
            MatchEventType::Halftime => "halftime",
            MatchEventType::Fulltime => "fulltime",
        }
    }
}

impl fmt::Display for MatchEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColor {
    Yellow,
    Red,
}

impl CardColor {
    pub fn event_type(&self) -> MatchEventType {
        match self {
            CardColor::Yellow => MatchEventType::YellowCard,
            CardColor::Red => MatchEventType::RedCard,
        }
    }
}

/// Incidents that share the plain "team + optional player" shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    Injury,
    Penalty,
    Corner,
}

impl IncidentKind {
    pub fn event_type(&self) -> MatchEventType {
        match self {
            IncidentKind::Injury => MatchEventType::Injury,
            IncidentKind::Penalty => MatchEventType::Penalty,
            IncidentKind::Corner => MatchEventType::Corner,
        }
    }
}

/// One entry of a match's event log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub id: Uuid,
    pub event_type: MatchEventType,
    pub team: String,
    pub minute: u8,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jersey_number: Option<u32>,
    // Substitutions only: the player coming on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_in_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_in_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_in_jersey: Option<u32>,
    pub timestamp: DateTime<Utc>,
}

impl MatchEvent {
    pub fn new(
        event_type: MatchEventType,
        team: impl Into<String>,
        minute: u8,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            team: team.into(),
            minute,
            description: description.into(),
            player_id: None,
            player_name: None,
            jersey_number: None,
            player_in_id: None,
            player_in_name: None,
            player_in_jersey: None,
            timestamp,
        }
    }

    pub fn with_player(mut self, player: Option<&Player>) -> Self {
        if let Some(player) = player {
            self.player_id = Some(player.id);
            self.player_name = Some(player.name.clone());
            self.jersey_number = player.jersey_number;
        }
        self
    }

    pub fn with_incoming_player(mut self, player: &Player) -> Self {
        self.player_in_id = Some(player.id);
        self.player_in_name = Some(player.name.clone());
        self.player_in_jersey = player.jersey_number;
        self
    }
}

/// Which side of the fixture a team name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

/// Match aggregate: score, clock, lineup and ordered event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub status: MatchStatus,
    pub current_minute: u8,
    #[serde(default)]
    pub venue: Option<String>,
    pub match_date: DateTime<Utc>,
    #[serde(default)]
    pub lineup: Vec<Player>,
    #[serde(default, deserialize_with = "deserialize_event_log")]
    pub events: Vec<MatchEvent>,
    #[serde(default)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn team_name(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::Home => &self.home_team,
            TeamSide::Away => &self.away_team,
        }
    }

    /// Resolve a display name to a side, ignoring case and surrounding whitespace.
    pub fn side_of(&self, team: &str) -> Option<TeamSide> {
        let team = team.trim().to_lowercase();
        if team == self.home_team.trim().to_lowercase() {
            Some(TeamSide::Home)
        } else if team == self.away_team.trim().to_lowercase() {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    /// "Home 1-0 Away"
    pub fn score_line(&self) -> String {
        format!("{} {}-{} {}", self.home_team, self.home_score, self.away_score, self.away_team)
    }

    pub fn goal_count(&self, side: TeamSide) -> u32 {
        let name = self.team_name(side);
        self.events
            .iter()
            .filter(|e| e.event_type == MatchEventType::Goal && e.team == name)
            .count() as u32
    }

    pub fn is_in_lineup(&self, player_id: Uuid) -> bool {
        self.lineup.iter().any(|p| p.id == player_id)
    }

    pub fn last_event(&self) -> Option<&MatchEvent> {
        self.events.last()
    }
}

/// Request to create a new match
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMatchRequest {
    pub home_team: String,
    pub away_team: String,
    pub venue: Option<String>,
    pub match_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SetLineupRequest {
    pub player_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct RecordGoalRequest {
    pub team: String,
    pub player_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct RecordCardRequest {
    pub team: String,
    pub color: CardColor,
    pub player_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct RecordIncidentRequest {
    pub kind: IncidentKind,
    pub team: String,
    pub player_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct RecordSubstitutionRequest {
    pub team: String,
    pub player_out_id: Uuid,
    pub player_in_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SetMinuteRequest {
    pub minute: i32,
}

#[derive(Debug, Deserialize)]
pub struct SubstitutionCandidatesQuery {
    pub player_out: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub context: crate::game::broadcast_formatter::SummaryContext,
}

/// Snapshot plus the share text produced by a mutating operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchUpdateResponse {
    #[serde(rename = "match")]
    pub match_state: Match,
    pub event: Option<MatchEvent>,
    pub broadcast: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubstitutionCandidatesResponse {
    pub outgoing: Vec<Player>,
    pub incoming: Vec<Player>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchSummaryResponse {
    pub match_id: Uuid,
    pub text: String,
}
