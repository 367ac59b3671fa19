use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::match_store::{MatchStore, StoreError};
use crate::models::live_match::{Match, MatchStatus};
use crate::models::player::Player;
use crate::utils::event_log::events_from_value;

const MATCH_COLUMNS: &str = "
    id, home_team, away_team, home_score, away_score, status, current_minute,
    venue, match_date, lineup, events, version, created_at, updated_at
";

#[derive(Debug, Clone)]
pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn match_from_row(row: &PgRow) -> Result<Match, StoreError> {
        let status: String = row.try_get("status")?;
        let status = MatchStatus::try_from(status.as_str()).map_err(StoreError::InvalidRow)?;
        let home_score: i32 = row.try_get("home_score")?;
        let away_score: i32 = row.try_get("away_score")?;
        let current_minute: i16 = row.try_get("current_minute")?;
        let lineup: Json<Vec<Player>> = row.try_get("lineup")?;
        // Older rows may hold a keyed object instead of an array
        let events: serde_json::Value = row.try_get("events")?;

        Ok(Match {
            id: row.try_get("id")?,
            home_team: row.try_get("home_team")?,
            away_team: row.try_get("away_team")?,
            home_score: to_unsigned(home_score, "home_score")?,
            away_score: to_unsigned(away_score, "away_score")?,
            status,
            current_minute: u8::try_from(current_minute)
                .map_err(|_| StoreError::InvalidRow(format!("current_minute {} out of range", current_minute)))?,
            venue: row.try_get("venue")?,
            match_date: row.try_get::<DateTime<Utc>, _>("match_date")?,
            lineup: lineup.0,
            events: events_from_value(events)?,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn player_from_row(row: &PgRow) -> Result<Player, StoreError> {
        let jersey_number: Option<i32> = row.try_get("jersey_number")?;
        Ok(Player {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            jersey_number: jersey_number.map(|n| to_unsigned(n, "jersey_number")).transpose()?,
            position: row.try_get("position")?,
            active: row.try_get("active")?,
        })
    }
}

fn to_unsigned(value: i32, column: &str) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| StoreError::InvalidRow(format!("{} is negative: {}", column, value)))
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn insert_match(&self, new_match: &Match) -> Result<Match, StoreError> {
        info!("Inserting match {}: {} vs {}", new_match.id, new_match.home_team, new_match.away_team);

        let query = format!(
            "INSERT INTO matches (
                id, home_team, away_team, home_score, away_score, status, current_minute,
                venue, match_date, lineup, events, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0, $12, $13)
            RETURNING {}",
            MATCH_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(new_match.id)
            .bind(&new_match.home_team)
            .bind(&new_match.away_team)
            .bind(new_match.home_score as i32)
            .bind(new_match.away_score as i32)
            .bind(new_match.status.as_str())
            .bind(new_match.current_minute as i16)
            .bind(&new_match.venue)
            .bind(new_match.match_date)
            .bind(Json(&new_match.lineup))
            .bind(Json(&new_match.events))
            .bind(new_match.created_at)
            .bind(new_match.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Self::match_from_row(&row)
    }

    async fn get_match(&self, match_id: Uuid) -> Result<Match, StoreError> {
        let query = format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS);
        let row = sqlx::query(&query)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(match_id))?;

        Self::match_from_row(&row)
    }

    async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
        let query = format!("SELECT {} FROM matches ORDER BY match_date DESC", MATCH_COLUMNS);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(Self::match_from_row).collect()
    }

    async fn save(&self, updated: &Match, expected_version: i64) -> Result<Match, StoreError> {
        let query = format!(
            "UPDATE matches SET
                home_score = $3,
                away_score = $4,
                status = $5,
                current_minute = $6,
                venue = $7,
                lineup = $8,
                events = $9,
                version = version + 1,
                updated_at = $10
            WHERE id = $1 AND version = $2
            RETURNING {}",
            MATCH_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(updated.id)
            .bind(expected_version)
            .bind(updated.home_score as i32)
            .bind(updated.away_score as i32)
            .bind(updated.status.as_str())
            .bind(updated.current_minute as i16)
            .bind(&updated.venue)
            .bind(Json(&updated.lineup))
            .bind(Json(&updated.events))
            .bind(updated.updated_at)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::match_from_row(&row),
            None => {
                // Either the match is gone or someone else wrote first
                let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM matches WHERE id = $1)")
                    .bind(updated.id)
                    .fetch_one(&self.pool)
                    .await?;
                if exists {
                    debug!("Version conflict on match {} (expected {})", updated.id, expected_version);
                    Err(StoreError::VersionConflict {
                        id: updated.id,
                        expected: expected_version,
                    })
                } else {
                    Err(StoreError::NotFound(updated.id))
                }
            }
        }
    }

    async fn active_roster(&self) -> Result<Vec<Player>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, jersey_number, position, active
             FROM players
             WHERE active = true
             ORDER BY jersey_number ASC NULLS LAST, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::player_from_row).collect()
    }

    async fn upsert_player(&self, player: &Player) -> Result<Player, StoreError> {
        let row = sqlx::query(
            "INSERT INTO players (id, name, jersey_number, position, active)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                jersey_number = EXCLUDED.jersey_number,
                position = EXCLUDED.position,
                active = EXCLUDED.active,
                updated_at = NOW()
             RETURNING id, name, jersey_number, position, active",
        )
        .bind(player.id)
        .bind(&player.name)
        .bind(player.jersey_number.map(|n| n as i32))
        .bind(&player.position)
        .bind(player.active)
        .fetch_one(&self.pool)
        .await?;

        Self::player_from_row(&row)
    }
}
