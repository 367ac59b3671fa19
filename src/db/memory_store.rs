use std::collections::HashMap;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::db::match_store::{sort_roster, MatchStore, StoreError};
use crate::models::live_match::Match;
use crate::models::player::Player;

/// Process-local store, used for tests and local demos.
#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<HashMap<Uuid, Match>>,
    players: RwLock<HashMap<Uuid, Player>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn insert_match(&self, new_match: &Match) -> Result<Match, StoreError> {
        let mut stored = new_match.clone();
        stored.version = 0;
        self.matches.write().await.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_match(&self, match_id: Uuid) -> Result<Match, StoreError> {
        self.matches
            .read()
            .await
            .get(&match_id)
            .cloned()
            .ok_or(StoreError::NotFound(match_id))
    }

    async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
        let mut matches: Vec<Match> = self.matches.read().await.values().cloned().collect();
        matches.sort_by(|a, b| b.match_date.cmp(&a.match_date));
        Ok(matches)
    }

    async fn save(&self, updated: &Match, expected_version: i64) -> Result<Match, StoreError> {
        let mut matches = self.matches.write().await;
        let current = matches
            .get_mut(&updated.id)
            .ok_or(StoreError::NotFound(updated.id))?;

        if current.version != expected_version {
            debug!(
                "Version conflict on match {}: stored {}, expected {}",
                updated.id, current.version, expected_version
            );
            return Err(StoreError::VersionConflict {
                id: updated.id,
                expected: expected_version,
            });
        }

        let mut stored = updated.clone();
        stored.version = expected_version + 1;
        *current = stored.clone();
        Ok(stored)
    }

    async fn active_roster(&self) -> Result<Vec<Player>, StoreError> {
        let mut roster: Vec<Player> = self
            .players
            .read()
            .await
            .values()
            .filter(|p| p.active)
            .cloned()
            .collect();
        sort_roster(&mut roster);
        Ok(roster)
    }

    async fn upsert_player(&self, player: &Player) -> Result<Player, StoreError> {
        self.players.write().await.insert(player.id, player.clone());
        Ok(player.clone())
    }
}
