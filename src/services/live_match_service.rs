use std::sync::Arc;
use chrono::Utc;
use thiserror::Error as ThisError;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::match_center::MatchCenterSettings;
use crate::db::match_store::{MatchStore, StoreError};
use crate::game::broadcast_formatter::SummaryContext;
use crate::game::error::MatchError;
use crate::game::match_engine::{EngineOutcome, MatchEventEngine};
use crate::game::player_selection::{outgoing_candidates, SelectionError, SubstitutionSelection};
use crate::game::role_gate::OperationKind;
use crate::models::live_match::{
    CardColor, CreateMatchRequest, IncidentKind, Match, MatchUpdateResponse, SubstitutionCandidatesResponse,
};
use crate::models::match_events::{MatchFeedEvent, NotificationTarget};
use crate::models::player::Player;
use crate::models::user::UserRole;
use crate::services::broadcast_publisher::BroadcastPublisher;

#[derive(Debug, ThisError)]
pub enum LiveMatchError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Match {0} not found")]
    NotFound(Uuid),

    #[error("Player {0} not found")]
    PlayerNotFound(Uuid),

    #[error("Match {0} is being updated by someone else, please retry")]
    Conflict(Uuid),

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for LiveMatchError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => LiveMatchError::NotFound(id),
            StoreError::VersionConflict { id, .. } => LiveMatchError::Conflict(id),
            other => LiveMatchError::Store(other),
        }
    }
}

/// Runs engine operations against stored matches: read, mutate, write with
/// version check, then hand the broadcast to the publisher.
pub struct LiveMatchService {
    store: Arc<dyn MatchStore>,
    publisher: Arc<dyn BroadcastPublisher>,
    engine: MatchEventEngine,
    broadcast_topic: String,
    max_write_retries: u32,
}

impl LiveMatchService {
    pub fn new(
        store: Arc<dyn MatchStore>,
        publisher: Arc<dyn BroadcastPublisher>,
        settings: &MatchCenterSettings,
    ) -> Self {
        Self {
            store,
            publisher,
            engine: MatchEventEngine::from_settings(settings),
            broadcast_topic: settings.broadcast_topic.clone(),
            max_write_retries: settings.max_write_retries.max(1),
        }
    }

    pub fn engine(&self) -> &MatchEventEngine {
        &self.engine
    }

    pub async fn create_match(&self, role: UserRole, request: CreateMatchRequest) -> Result<MatchUpdateResponse, LiveMatchError> {
        let new_match = self.engine.create_match(role, request)?;
        let stored = self.store.insert_match(&new_match).await?;

        let announcement = self.engine.formatter().format_match_summary(&stored, SummaryContext::Created);
        self.publish(MatchFeedEvent::MatchAnnouncement {
            match_id: stored.id,
            status: stored.status,
            broadcast: announcement.clone(),
            timestamp: Utc::now(),
        })
        .await;

        Ok(MatchUpdateResponse {
            match_state: stored,
            event: None,
            broadcast: Some(announcement),
        })
    }

    pub async fn get_match(&self, role: UserRole, match_id: Uuid) -> Result<Match, LiveMatchError> {
        self.engine.authorize(role, OperationKind::ViewMatch)?;
        Ok(self.store.get_match(match_id).await?)
    }

    pub async fn list_matches(&self, role: UserRole) -> Result<Vec<Match>, LiveMatchError> {
        self.engine.authorize(role, OperationKind::ViewMatch)?;
        Ok(self.store.list_matches().await?)
    }

    pub async fn active_roster(&self, role: UserRole) -> Result<Vec<Player>, LiveMatchError> {
        self.engine.authorize(role, OperationKind::ViewMatch)?;
        Ok(self.store.active_roster().await?)
    }

    pub async fn upsert_player(&self, role: UserRole, player: Player) -> Result<Player, LiveMatchError> {
        self.engine.authorize(role, OperationKind::ManageRoster)?;
        if player.name.is_empty() {
            return Err(MatchError::Validation("Player name cannot be empty".into()).into());
        }
        let stored = self.store.upsert_player(&player).await?;
        info!("Saved roster player {} ({})", stored.label(), stored.id);
        Ok(stored)
    }

    pub async fn set_lineup(&self, match_id: Uuid, role: UserRole, player_ids: Vec<Uuid>) -> Result<MatchUpdateResponse, LiveMatchError> {
        self.engine.authorize(role, OperationKind::SetLineup)?;
        let roster = self.store.active_roster().await?;
        let players = player_ids
            .iter()
            .map(|id| {
                roster
                    .iter()
                    .find(|p| p.id == *id)
                    .cloned()
                    .ok_or(LiveMatchError::PlayerNotFound(*id))
            })
            .collect::<Result<Vec<Player>, LiveMatchError>>()?;

        self.mutate(match_id, |engine, m| Ok(engine.set_lineup(m, role, players.clone())?))
            .await
    }

    pub async fn start_match(&self, match_id: Uuid, role: UserRole) -> Result<MatchUpdateResponse, LiveMatchError> {
        self.mutate(match_id, |engine, m| Ok(engine.start_match(m, role)?)).await
    }

    pub async fn end_match(&self, match_id: Uuid, role: UserRole) -> Result<MatchUpdateResponse, LiveMatchError> {
        self.mutate(match_id, |engine, m| Ok(engine.end_match(m, role)?)).await
    }

    pub async fn record_halftime(&self, match_id: Uuid, role: UserRole) -> Result<MatchUpdateResponse, LiveMatchError> {
        self.mutate(match_id, |engine, m| Ok(engine.record_halftime(m, role)?)).await
    }

    pub async fn record_goal(
        &self,
        match_id: Uuid,
        role: UserRole,
        team: &str,
        player_id: Option<Uuid>,
    ) -> Result<MatchUpdateResponse, LiveMatchError> {
        self.engine.authorize(role, OperationKind::RecordGoal)?;
        let roster = self.roster_if_needed(player_id).await?;
        self.mutate(match_id, |engine, m| {
            engine.ensure_ready(m, role, OperationKind::RecordGoal)?;
            let scorer = find_player(player_id, m, &roster)?;
            Ok(engine.record_goal(m, role, team, scorer.as_ref())?)
        })
        .await
    }

    pub async fn undo_last_goal(&self, match_id: Uuid, role: UserRole) -> Result<MatchUpdateResponse, LiveMatchError> {
        self.mutate(match_id, |engine, m| Ok(engine.undo_last_goal(m, role)?)).await
    }

    pub async fn record_card(
        &self,
        match_id: Uuid,
        role: UserRole,
        team: &str,
        color: CardColor,
        player_id: Option<Uuid>,
    ) -> Result<MatchUpdateResponse, LiveMatchError> {
        self.engine.authorize(role, OperationKind::RecordCard)?;
        let roster = self.roster_if_needed(player_id).await?;
        self.mutate(match_id, |engine, m| {
            engine.ensure_ready(m, role, OperationKind::RecordCard)?;
            let player = find_player(player_id, m, &roster)?;
            Ok(engine.record_card(m, role, team, color, player.as_ref())?)
        })
        .await
    }

    pub async fn record_incident(
        &self,
        match_id: Uuid,
        role: UserRole,
        kind: IncidentKind,
        team: &str,
        player_id: Option<Uuid>,
    ) -> Result<MatchUpdateResponse, LiveMatchError> {
        let operation = OperationKind::from(kind);
        self.engine.authorize(role, operation)?;
        let roster = self.roster_if_needed(player_id).await?;
        self.mutate(match_id, |engine, m| {
            engine.ensure_ready(m, role, operation)?;
            let player = find_player(player_id, m, &roster)?;
            Ok(engine.record_incident(m, role, kind, team, player.as_ref())?)
        })
        .await
    }

    pub async fn record_substitution(
        &self,
        match_id: Uuid,
        role: UserRole,
        team: &str,
        player_out_id: Uuid,
        player_in_id: Uuid,
    ) -> Result<MatchUpdateResponse, LiveMatchError> {
        self.engine.authorize(role, OperationKind::RecordSubstitution)?;
        let roster = self.store.active_roster().await?;
        self.mutate(match_id, |engine, m| {
            engine.ensure_ready(m, role, OperationKind::RecordSubstitution)?;
            let player_out = find_player(Some(player_out_id), m, &roster)?
                .ok_or(LiveMatchError::PlayerNotFound(player_out_id))?;
            let player_in = find_player(Some(player_in_id), m, &roster)?
                .ok_or(LiveMatchError::PlayerNotFound(player_in_id))?;
            Ok(engine.record_substitution(m, role, team, &player_out, &player_in)?)
        })
        .await
    }

    pub async fn set_minute(&self, match_id: Uuid, role: UserRole, minute: i32) -> Result<MatchUpdateResponse, LiveMatchError> {
        self.mutate(match_id, |engine, m| Ok(engine.set_minute(m, role, minute)?)).await
    }

    pub async fn increment_minute(&self, match_id: Uuid, role: UserRole) -> Result<MatchUpdateResponse, LiveMatchError> {
        self.mutate(match_id, |engine, m| Ok(engine.increment_minute(m, role)?)).await
    }

    pub async fn decrement_minute(&self, match_id: Uuid, role: UserRole) -> Result<MatchUpdateResponse, LiveMatchError> {
        self.mutate(match_id, |engine, m| Ok(engine.decrement_minute(m, role)?)).await
    }

    /// Selection pools for the two-step substitution flow. With `player_out`
    /// the incoming pool comes from the pending selection.
    pub async fn substitution_candidates(
        &self,
        match_id: Uuid,
        role: UserRole,
        player_out: Option<Uuid>,
    ) -> Result<SubstitutionCandidatesResponse, LiveMatchError> {
        self.engine.authorize(role, OperationKind::RecordSubstitution)?;
        let current = self.store.get_match(match_id).await?;
        let roster = self.store.active_roster().await?;

        let incoming = match player_out {
            Some(player_out_id) => {
                SubstitutionSelection::select_outgoing(&current, player_out_id)?.incoming_candidates(&roster)
            }
            None => roster
                .into_iter()
                .filter(|p| !current.is_in_lineup(p.id))
                .collect(),
        };

        Ok(SubstitutionCandidatesResponse {
            outgoing: outgoing_candidates(&current),
            incoming,
        })
    }

    pub async fn match_summary(&self, match_id: Uuid, role: UserRole, context: SummaryContext) -> Result<String, LiveMatchError> {
        self.engine.authorize(role, OperationKind::ViewSummary)?;
        let current = self.store.get_match(match_id).await?;
        Ok(self.engine.formatter().format_match_summary(&current, context))
    }

    async fn roster_if_needed(&self, player_id: Option<Uuid>) -> Result<Vec<Player>, LiveMatchError> {
        match player_id {
            Some(_) => Ok(self.store.active_roster().await?),
            None => Ok(Vec::new()),
        }
    }

    /// Read-modify-write with compare-and-swap on the match version. On a
    /// conflict the operation is replayed against a fresh snapshot.
    async fn mutate<F>(&self, match_id: Uuid, operation: F) -> Result<MatchUpdateResponse, LiveMatchError>
    where
        F: Fn(&MatchEventEngine, &mut Match) -> Result<EngineOutcome, LiveMatchError>,
    {
        for attempt in 1..=self.max_write_retries {
            let mut current = self.store.get_match(match_id).await?;
            let expected_version = current.version;
            let outcome = operation(&self.engine, &mut current)?;

            match self.store.save(&current, expected_version).await {
                Ok(saved) => {
                    if let (Some(event), Some(broadcast)) = (&outcome.event, &outcome.broadcast) {
                        self.publish(MatchFeedEvent::MatchEventRecorded {
                            match_id: saved.id,
                            event_id: event.id,
                            kind: event.event_type,
                            minute: event.minute,
                            home_score: saved.home_score,
                            away_score: saved.away_score,
                            broadcast: broadcast.clone(),
                            timestamp: event.timestamp,
                        })
                        .await;
                    }
                    return Ok(MatchUpdateResponse {
                        match_state: saved,
                        event: outcome.event,
                        broadcast: outcome.broadcast,
                    });
                }
                Err(StoreError::VersionConflict { .. }) => {
                    warn!(
                        "Version conflict on match {} (attempt {}/{}), retrying",
                        match_id, attempt, self.max_write_retries
                    );
                }
                Err(e) => {
                    error!("Failed to save match {}: {}", match_id, e);
                    return Err(e.into());
                }
            }
        }

        Err(LiveMatchError::Conflict(match_id))
    }

    async fn publish(&self, event: MatchFeedEvent) {
        let target = NotificationTarget::Topic(self.broadcast_topic.clone());
        if let Err(e) = self.publisher.publish(&target, &event).await {
            error!("Failed to publish broadcast for match {}: {}", event.match_id(), e);
        }
    }
}

/// Look a player up in the match lineup first, then in the active roster.
fn find_player(player_id: Option<Uuid>, m: &Match, roster: &[Player]) -> Result<Option<Player>, LiveMatchError> {
    let Some(id) = player_id else {
        return Ok(None);
    };
    m.lineup
        .iter()
        .chain(roster.iter())
        .find(|p| p.id == id)
        .cloned()
        .map(Some)
        .ok_or(LiveMatchError::PlayerNotFound(id))
}
