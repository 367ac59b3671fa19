use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::live_match::{MatchEventType, MatchStatus};

/// Realtime message published for subscribers of a match feed
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "event_type")]
pub enum MatchFeedEvent {
    #[serde(rename = "match_event_recorded")]
    MatchEventRecorded {
        match_id: Uuid,
        event_id: Uuid,
        kind: MatchEventType,
        minute: u8,
        home_score: u32,
        away_score: u32,
        broadcast: String,
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "match_announcement")]
    MatchAnnouncement {
        match_id: Uuid,
        status: MatchStatus,
        broadcast: String,
        timestamp: DateTime<Utc>,
    },
}

impl MatchFeedEvent {
    pub fn match_id(&self) -> Uuid {
        match self {
            MatchFeedEvent::MatchEventRecorded { match_id, .. } => *match_id,
            MatchFeedEvent::MatchAnnouncement { match_id, .. } => *match_id,
        }
    }

    pub fn broadcast(&self) -> &str {
        match self {
            MatchFeedEvent::MatchEventRecorded { broadcast, .. } => broadcast,
            MatchFeedEvent::MatchAnnouncement { broadcast, .. } => broadcast,
        }
    }
}

/// Where a broadcast is delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationTarget {
    /// Every subscriber of a topic
    Topic(String),
}

impl NotificationTarget {
    pub fn channel(&self) -> String {
        match self {
            NotificationTarget::Topic(topic) => format!("match:events:topic:{}", topic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_event_is_tagged() {
        let event = MatchFeedEvent::MatchAnnouncement {
            match_id: Uuid::nil(),
            status: MatchStatus::Live,
            broadcast: "Kick-off".to_string(),
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event_type"], "match_announcement");
        assert_eq!(value["status"], "live");
    }

    #[test]
    fn test_target_channels() {
        assert_eq!(NotificationTarget::Topic("fans".into()).channel(), "match:events:topic:fans");
    }
}
