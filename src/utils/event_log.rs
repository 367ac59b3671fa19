use std::cmp::Ordering;
use std::collections::BTreeMap;
use serde::{Deserialize, Deserializer};

use crate::models::live_match::MatchEvent;

/// Stored logs arrive either as an array or as an object keyed by push id / index.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEventLog {
    Ordered(Vec<MatchEvent>),
    Keyed(BTreeMap<String, MatchEvent>),
}

/// Normalize a stored event log into the canonical ordered sequence.
pub fn deserialize_event_log<'de, D>(deserializer: D) -> Result<Vec<MatchEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Option::<StoredEventLog>::deserialize(deserializer)?;
    Ok(match stored {
        None => Vec::new(),
        Some(StoredEventLog::Ordered(events)) => events,
        Some(StoredEventLog::Keyed(map)) => order_keyed_events(map),
    })
}

/// Keyed logs are ordered by event timestamp, ties broken by key.
pub fn order_keyed_events(map: BTreeMap<String, MatchEvent>) -> Vec<MatchEvent> {
    let mut entries: Vec<(String, MatchEvent)> = map.into_iter().collect();
    entries.sort_by(|(key_a, a), (key_b, b)| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| compare_keys(key_a, key_b))
    });
    entries.into_iter().map(|(_, event)| event).collect()
}

fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

/// Parse an event log from a raw JSON value (as read from a JSONB column).
pub fn events_from_value(value: serde_json::Value) -> Result<Vec<MatchEvent>, serde_json::Error> {
    deserialize_event_log(value)
}
