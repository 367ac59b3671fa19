use serde::Deserialize;

/// Live match console settings
#[derive(Debug, Clone, Deserialize)]
pub struct MatchCenterSettings {
    /// Team names containing this (case-insensitive) get per-player attribution
    pub tracked_club_name: String,
    /// Appended to every share message
    #[serde(default)]
    pub promo_suffix: String,
    /// Topic every fan is subscribed to
    pub broadcast_topic: String,
    #[serde(default = "default_max_write_retries")]
    pub max_write_retries: u32,
}

fn default_max_write_retries() -> u32 {
    3
}

impl Default for MatchCenterSettings {
    fn default() -> Self {
        Self {
            tracked_club_name: "Nkoroi".to_string(),
            promo_suffix: String::new(),
            broadcast_topic: "all_fans".to_string(),
            max_write_retries: default_max_write_retries(),
        }
    }
}
