//! Persistence boundary for matches and the roster.
//!
//! Writes use optimistic concurrency: `save` only succeeds when the stored
//! version equals the version the caller read, and bumps it by one.

use async_trait::async_trait;
use thiserror::Error as ThisError;
use uuid::Uuid;

use crate::models::live_match::Match;
use crate::models::player::Player;

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("Match {0} not found")]
    NotFound(Uuid),

    #[error("Match {id} was modified concurrently (expected version {expected})")]
    VersionConflict { id: Uuid, expected: i64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn insert_match(&self, new_match: &Match) -> Result<Match, StoreError>;

    async fn get_match(&self, match_id: Uuid) -> Result<Match, StoreError>;

    /// Newest match date first
    async fn list_matches(&self) -> Result<Vec<Match>, StoreError>;

    /// Full snapshot replace guarded by `expected_version`. Returns the stored
    /// snapshot carrying its new version.
    async fn save(&self, updated: &Match, expected_version: i64) -> Result<Match, StoreError>;

    /// Players with `active = true`, ordered by jersey number then name
    async fn active_roster(&self) -> Result<Vec<Player>, StoreError>;

    async fn upsert_player(&self, player: &Player) -> Result<Player, StoreError>;
}

/// Roster ordering shared by the store implementations.
pub fn sort_roster(players: &mut [Player]) {
    players.sort_by(|a, b| {
        let jersey = |p: &Player| p.jersey_number.unwrap_or(u32::MAX);
        jersey(a).cmp(&jersey(b)).then_with(|| a.name.cmp(&b.name))
    });
}
