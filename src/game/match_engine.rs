use std::collections::HashSet;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::match_center::MatchCenterSettings;
use crate::game::broadcast_formatter::BroadcastFormatter;
use crate::game::error::MatchError;
use crate::game::player_selection::SubstitutionSelection;
use crate::game::role_gate::{OperationKind, RoleGate};
use crate::models::live_match::{
    CardColor, CreateMatchRequest, IncidentKind, Match, MatchEvent, MatchEventType, MatchStatus,
    TeamSide, MAX_MINUTE,
};
use crate::models::player::Player;
use crate::models::user::UserRole;

/// Result of a successful engine operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineOutcome {
    /// Event appended to the log, if any
    pub event: Option<MatchEvent>,
    /// Share text for the appended event, if any
    pub broadcast: Option<String>,
}

impl EngineOutcome {
    fn silent() -> Self {
        Self::default()
    }
}

/// Sole authority for mutating a match's live state and event log.
///
/// Every operation checks the role gate first, then the match status, then its
/// arguments. Work happens on a copy that replaces the caller's match only on
/// success.
#[derive(Debug, Clone)]
pub struct MatchEventEngine {
    tracked_club_name: String,
    formatter: BroadcastFormatter,
}

impl MatchEventEngine {
    pub fn new(tracked_club_name: impl Into<String>, promo_suffix: impl Into<String>) -> Self {
        Self {
            tracked_club_name: tracked_club_name.into().trim().to_lowercase(),
            formatter: BroadcastFormatter::new(promo_suffix),
        }
    }

    pub fn from_settings(settings: &MatchCenterSettings) -> Self {
        Self::new(settings.tracked_club_name.clone(), settings.promo_suffix.clone())
    }

    pub fn formatter(&self) -> &BroadcastFormatter {
        &self.formatter
    }

    /// Only the tracked club's players are followed individually.
    pub fn is_tracked_club(&self, team: &str) -> bool {
        !self.tracked_club_name.is_empty() && team.to_lowercase().contains(&self.tracked_club_name)
    }

    pub fn authorize(&self, role: UserRole, operation: OperationKind) -> Result<(), MatchError> {
        if RoleGate::allows(role, operation) {
            Ok(())
        } else {
            warn!("Denied {} for role {}", operation, role);
            Err(MatchError::Unauthorized { role, operation })
        }
    }

    /// Role gate, then status. Callers that resolve players before running an
    /// operation check this first so lookups never mask either failure.
    pub fn ensure_ready(
        &self,
        m: &Match,
        role: UserRole,
        operation: OperationKind,
    ) -> Result<(), MatchError> {
        self.authorize(role, operation)?;
        match required_status(operation) {
            Some(required) if m.status != required => {
                debug!("Rejected {} on match {} in status {}", operation, m.id, m.status);
                Err(MatchError::InvalidTransition { from: m.status, operation })
            }
            _ => Ok(()),
        }
    }

    /// Build a new upcoming match.
    pub fn create_match(&self, role: UserRole, request: CreateMatchRequest) -> Result<Match, MatchError> {
        self.authorize(role, OperationKind::CreateMatch)?;

        let home_team = request.home_team.trim().to_string();
        let away_team = request.away_team.trim().to_string();
        if home_team.is_empty() || away_team.is_empty() {
            return Err(MatchError::Validation("Team names cannot be empty".into()));
        }
        if home_team.to_lowercase() == away_team.to_lowercase() {
            return Err(MatchError::Validation("A team cannot play itself".into()));
        }

        let now = Utc::now();
        let new_match = Match {
            id: Uuid::new_v4(),
            home_team,
            away_team,
            home_score: 0,
            away_score: 0,
            status: MatchStatus::Upcoming,
            current_minute: 0,
            venue: request
                .venue
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            match_date: request.match_date,
            lineup: Vec::new(),
            events: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        info!("Created match {}: {} vs {}", new_match.id, new_match.home_team, new_match.away_team);
        Ok(new_match)
    }

    /// Replace the lineup before kickoff.
    pub fn set_lineup(&self, m: &mut Match, role: UserRole, players: Vec<Player>) -> Result<EngineOutcome, MatchError> {
        self.apply(m, role, OperationKind::SetLineup, |working| {
            let mut seen = HashSet::new();
            for player in &players {
                if !seen.insert(player.id) {
                    return Err(MatchError::InvalidLineup(format!("{} is listed twice", player.name)));
                }
                if !player.active {
                    return Err(MatchError::InvalidLineup(format!("{} is not active", player.name)));
                }
            }
            working.lineup = players;
            Ok(EngineOutcome::silent())
        })
    }

    pub fn start_match(&self, m: &mut Match, role: UserRole) -> Result<EngineOutcome, MatchError> {
        self.apply(m, role, OperationKind::StartMatch, |working| {
            working.status = MatchStatus::Live;
            working.current_minute = 0;
            let description = format!("Kick-off: {} vs {}", working.home_team, working.away_team);
            let fixture = fixture_label(working);
            Ok(self.append(working, MatchEventType::Kickoff, fixture, description, None))
        })
    }

    pub fn end_match(&self, m: &mut Match, role: UserRole) -> Result<EngineOutcome, MatchError> {
        self.apply(m, role, OperationKind::EndMatch, |working| {
            working.status = MatchStatus::Finished;
            let description = format!("Full-time: {}", working.score_line());
            let fixture = fixture_label(working);
            Ok(self.append(working, MatchEventType::Fulltime, fixture, description, None))
        })
    }

    pub fn record_halftime(&self, m: &mut Match, role: UserRole) -> Result<EngineOutcome, MatchError> {
        self.apply(m, role, OperationKind::RecordHalftime, |working| {
            let description = format!("Half-time: {}", working.score_line());
            let fixture = fixture_label(working);
            Ok(self.append(working, MatchEventType::Halftime, fixture, description, None))
        })
    }

    pub fn record_goal(
        &self,
        m: &mut Match,
        role: UserRole,
        team: &str,
        scorer: Option<&Player>,
    ) -> Result<EngineOutcome, MatchError> {
        self.apply(m, role, OperationKind::RecordGoal, |working| {
            let side = resolve_side(working, team)?;
            let scorer = self.attribute(working, side, scorer)?;
            match side {
                TeamSide::Home => working.home_score += 1,
                TeamSide::Away => working.away_score += 1,
            }
            let team_name = working.team_name(side).to_string();
            let description = match &scorer {
                Some(p) => format!("Goal for {}! Scored by {}. {}", team_name, p.label(), working.score_line()),
                None => format!("Goal for {}! {}", team_name, working.score_line()),
            };
            Ok(self.append(working, MatchEventType::Goal, team_name, description, scorer.as_ref()))
        })
    }

    /// Remove the most recent goal and take it off the scoreboard.
    pub fn undo_last_goal(&self, m: &mut Match, role: UserRole) -> Result<EngineOutcome, MatchError> {
        self.apply(m, role, OperationKind::UndoLastGoal, |working| {
            let index = working
                .events
                .iter()
                .rposition(|e| e.event_type == MatchEventType::Goal)
                .ok_or(MatchError::NoGoalToUndo)?;
            let removed = working.events.remove(index);
            match working.side_of(&removed.team) {
                Some(TeamSide::Home) => working.home_score = working.home_score.saturating_sub(1),
                Some(TeamSide::Away) => working.away_score = working.away_score.saturating_sub(1),
                None => return Err(MatchError::UnknownTeam(removed.team)),
            }
            info!("Undid goal {} in match {}: {}", removed.id, working.id, working.score_line());
            Ok(EngineOutcome::silent())
        })
    }

    pub fn record_card(
        &self,
        m: &mut Match,
        role: UserRole,
        team: &str,
        color: CardColor,
        player: Option<&Player>,
    ) -> Result<EngineOutcome, MatchError> {
        self.apply(m, role, OperationKind::RecordCard, |working| {
            let side = resolve_side(working, team)?;
            let player = self.attribute(working, side, player)?;
            let team_name = working.team_name(side).to_string();
            let color_name = match color {
                CardColor::Yellow => "Yellow",
                CardColor::Red => "Red",
            };
            let description = match &player {
                Some(p) => format!("{} card: {} ({})", color_name, p.label(), team_name),
                None => format!("{} card for {}", color_name, team_name),
            };
            Ok(self.append(working, color.event_type(), team_name, description, player.as_ref()))
        })
    }

    pub fn record_injury(
        &self,
        m: &mut Match,
        role: UserRole,
        team: &str,
        player: Option<&Player>,
    ) -> Result<EngineOutcome, MatchError> {
        self.record_incident(m, role, IncidentKind::Injury, team, player)
    }

    pub fn record_penalty(
        &self,
        m: &mut Match,
        role: UserRole,
        team: &str,
        player: Option<&Player>,
    ) -> Result<EngineOutcome, MatchError> {
        self.record_incident(m, role, IncidentKind::Penalty, team, player)
    }

    pub fn record_corner(
        &self,
        m: &mut Match,
        role: UserRole,
        team: &str,
        player: Option<&Player>,
    ) -> Result<EngineOutcome, MatchError> {
        self.record_incident(m, role, IncidentKind::Corner, team, player)
    }

    pub fn record_incident(
        &self,
        m: &mut Match,
        role: UserRole,
        kind: IncidentKind,
        team: &str,
        player: Option<&Player>,
    ) -> Result<EngineOutcome, MatchError> {
        self.apply(m, role, OperationKind::from(kind), |working| {
            let side = resolve_side(working, team)?;
            let player = self.attribute(working, side, player)?;
            let team_name = working.team_name(side).to_string();
            let description = match (kind, &player) {
                (IncidentKind::Injury, Some(p)) => format!("Injury: {} ({})", p.label(), team_name),
                (IncidentKind::Injury, None) => format!("Injury for {}", team_name),
                (IncidentKind::Penalty, Some(p)) => format!("Penalty to {} ({})", team_name, p.label()),
                (IncidentKind::Penalty, None) => format!("Penalty to {}", team_name),
                (IncidentKind::Corner, Some(p)) => format!("Corner to {} ({})", team_name, p.label()),
                (IncidentKind::Corner, None) => format!("Corner to {}", team_name),
            };
            Ok(self.append(working, kind.event_type(), team_name, description, player.as_ref()))
        })
    }

    /// Swap a lineup player for a bench player. For the tracked club the lineup
    /// slot is replaced in place; for opponents only the event is logged.
    pub fn record_substitution(
        &self,
        m: &mut Match,
        role: UserRole,
        team: &str,
        player_out: &Player,
        player_in: &Player,
    ) -> Result<EngineOutcome, MatchError> {
        self.apply(m, role, OperationKind::RecordSubstitution, |working| {
            let side = resolve_side(working, team)?;
            let team_name = working.team_name(side).to_string();
            if player_out.id == player_in.id {
                return Err(MatchError::InvalidSubstitution("incoming and outgoing player are the same".into()));
            }

            if self.is_tracked_club(&team_name) {
                let choice = SubstitutionSelection::select_outgoing(working, player_out.id)?
                    .select_incoming(player_in.clone())?;
                let slot = working
                    .lineup
                    .iter()
                    .position(|p| p.id == choice.player_out.id)
                    .ok_or(MatchError::PlayerNotInLineup(choice.player_out.id))?;
                working.lineup[slot] = choice.player_in;
            }

            let description = format!("{} OFF → {} ON ({})", player_out.label(), player_in.label(), team_name);
            let timestamp = next_timestamp(working);
            let event = MatchEvent::new(MatchEventType::Substitution, team_name, working.current_minute, description, timestamp)
                .with_player(Some(player_out))
                .with_incoming_player(player_in);
            Ok(self.push(working, event))
        })
    }

    /// Absolute minute correction.
    pub fn set_minute(&self, m: &mut Match, role: UserRole, minute: i32) -> Result<EngineOutcome, MatchError> {
        self.apply(m, role, OperationKind::SetMinute, |working| {
            if !(0..=MAX_MINUTE as i32).contains(&minute) {
                return Err(MatchError::InvalidMinute(minute));
            }
            working.current_minute = minute as u8;
            Ok(EngineOutcome::silent())
        })
    }

    pub fn increment_minute(&self, m: &mut Match, role: UserRole) -> Result<EngineOutcome, MatchError> {
        self.apply(m, role, OperationKind::IncrementMinute, |working| {
            working.current_minute = working.current_minute.saturating_add(1).min(MAX_MINUTE);
            Ok(EngineOutcome::silent())
        })
    }

    pub fn decrement_minute(&self, m: &mut Match, role: UserRole) -> Result<EngineOutcome, MatchError> {
        self.apply(m, role, OperationKind::DecrementMinute, |working| {
            working.current_minute = working.current_minute.saturating_sub(1);
            Ok(EngineOutcome::silent())
        })
    }

    fn apply<F>(
        &self,
        m: &mut Match,
        role: UserRole,
        operation: OperationKind,
        f: F,
    ) -> Result<EngineOutcome, MatchError>
    where
        F: FnOnce(&mut Match) -> Result<EngineOutcome, MatchError>,
    {
        self.ensure_ready(m, role, operation)?;

        let mut working = m.clone();
        let outcome = f(&mut working)?;
        working.updated_at = Utc::now();
        *m = working;

        if let Some(event) = &outcome.event {
            info!(
                "Match {} {}' {}: {} ({})",
                m.id, event.minute, event.event_type, event.description, m.score_line()
            );
        }
        Ok(outcome)
    }

    /// The tracked club must name a lineup player once a lineup exists.
    fn attribute(&self, m: &Match, side: TeamSide, player: Option<&Player>) -> Result<Option<Player>, MatchError> {
        let team = m.team_name(side);
        if !self.is_tracked_club(team) || m.lineup.is_empty() {
            return Ok(player.cloned());
        }
        match player {
            None => Err(MatchError::PlayerAttributionRequired { team: team.to_string() }),
            Some(p) => m
                .lineup
                .iter()
                .find(|l| l.id == p.id)
                .cloned()
                .map(Some)
                .ok_or(MatchError::PlayerNotInLineup(p.id)),
        }
    }

    fn append(
        &self,
        m: &mut Match,
        event_type: MatchEventType,
        team: String,
        description: String,
        player: Option<&Player>,
    ) -> EngineOutcome {
        let timestamp = next_timestamp(m);
        let event = MatchEvent::new(event_type, team, m.current_minute, description, timestamp).with_player(player);
        self.push(m, event)
    }

    fn push(&self, m: &mut Match, event: MatchEvent) -> EngineOutcome {
        m.events.push(event.clone());
        let broadcast = self.formatter.format_event(&event, m);
        EngineOutcome {
            event: Some(event),
            broadcast: Some(broadcast),
        }
    }
}

/// Status an operation needs; `None` for operations not tied to a live match.
fn required_status(operation: OperationKind) -> Option<MatchStatus> {
    match operation {
        OperationKind::ViewMatch
        | OperationKind::ViewSummary
        | OperationKind::CreateMatch
        | OperationKind::ManageRoster => None,
        OperationKind::SetLineup | OperationKind::StartMatch => Some(MatchStatus::Upcoming),
        OperationKind::EndMatch
        | OperationKind::RecordGoal
        | OperationKind::UndoLastGoal
        | OperationKind::RecordCard
        | OperationKind::RecordSubstitution
        | OperationKind::RecordInjury
        | OperationKind::RecordPenalty
        | OperationKind::RecordCorner
        | OperationKind::RecordHalftime
        | OperationKind::SetMinute
        | OperationKind::IncrementMinute
        | OperationKind::DecrementMinute => Some(MatchStatus::Live),
    }
}

fn resolve_side(m: &Match, team: &str) -> Result<TeamSide, MatchError> {
    m.side_of(team).ok_or_else(|| MatchError::UnknownTeam(team.to_string()))
}

fn fixture_label(m: &Match) -> String {
    format!("{} vs {}", m.home_team, m.away_team)
}

/// Wall clock, nudged forward so the log stays strictly increasing.
fn next_timestamp(m: &Match) -> DateTime<Utc> {
    let now = Utc::now();
    match m.last_event() {
        Some(last) if now <= last.timestamp => last.timestamp + Duration::milliseconds(1),
        _ => now,
    }
}
