use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roster entry for the tracked club. Created and edited outside the match engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub jersey_number: Option<u32>,
    #[serde(default)]
    pub position: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Player {
    pub fn new(name: impl Into<String>, jersey_number: Option<u32>, position: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            jersey_number,
            position: position.into(),
            active: true,
        }
    }

    /// "Name (#10)" or just "Name" when no jersey is assigned.
    pub fn label(&self) -> String {
        match self.jersey_number {
            Some(number) => format!("{} (#{})", self.name, number),
            None => self.name.clone(),
        }
    }
}

/// Request to create or update a roster player
#[derive(Debug, Deserialize)]
pub struct UpsertPlayerRequest {
    pub id: Option<Uuid>,
    pub name: String,
    pub jersey_number: Option<u32>,
    #[serde(default)]
    pub position: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl From<UpsertPlayerRequest> for Player {
    fn from(request: UpsertPlayerRequest) -> Self {
        Self {
            id: request.id.unwrap_or_else(Uuid::new_v4),
            name: request.name.trim().to_string(),
            jersey_number: request.jersey_number,
            position: request.position,
            active: request.active,
        }
    }
}
