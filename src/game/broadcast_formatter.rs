use serde::{Deserialize, Serialize};

use crate::models::live_match::{Match, MatchEvent, MatchEventType};

/// What a non-event broadcast announces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryContext {
    Created,
    Started,
    Finished,
}

/// Turns match events into share text for messaging apps.
/// Uses WhatsApp markup (`*bold*`).
#[derive(Debug, Clone)]
pub struct BroadcastFormatter {
    promo_suffix: String,
}

impl BroadcastFormatter {
    pub fn new(promo_suffix: impl Into<String>) -> Self {
        Self {
            promo_suffix: promo_suffix.into(),
        }
    }

    pub fn emoji(event_type: MatchEventType) -> &'static str {
        match event_type {
            MatchEventType::Kickoff => "🟢",
            MatchEventType::Goal => "⚽",
            MatchEventType::YellowCard => "🟨",
            MatchEventType::RedCard => "🟥",
            MatchEventType::Substitution => "🔄",
            MatchEventType::Injury => "🚑",
            MatchEventType::Penalty => "🎯",
            MatchEventType::Corner => "🚩",
            MatchEventType::Halftime => "⏸️",
            MatchEventType::Fulltime => "🏁",
        }
    }

    pub fn title(event_type: MatchEventType) -> &'static str {
        match event_type {
            MatchEventType::Kickoff => "KICK-OFF",
            MatchEventType::Goal => "GOAL",
            MatchEventType::YellowCard => "YELLOW CARD",
            MatchEventType::RedCard => "RED CARD",
            MatchEventType::Substitution => "SUBSTITUTION",
            MatchEventType::Injury => "INJURY",
            MatchEventType::Penalty => "PENALTY",
            MatchEventType::Corner => "CORNER",
            MatchEventType::Halftime => "HALF-TIME",
            MatchEventType::Fulltime => "FULL-TIME",
        }
    }

    /// Share text for a single recorded event.
    pub fn format_event(&self, event: &MatchEvent, match_state: &Match) -> String {
        let mut lines = vec![
            format!(
                "{} *{}* {}'",
                Self::emoji(event.event_type),
                Self::title(event.event_type),
                event.minute
            ),
            event.description.clone(),
            String::new(),
            format!("*{}*", match_state.score_line()),
        ];
        if let Some(venue) = venue_line(match_state) {
            lines.push(venue);
        }
        self.finish(lines)
    }

    /// Share text for announcements that are not tied to one event.
    pub fn format_match_summary(&self, match_state: &Match, context: SummaryContext) -> String {
        let mut lines = match context {
            SummaryContext::Created => vec![
                "📅 *MATCH DAY*".to_string(),
                format!("*{}* vs *{}*", match_state.home_team, match_state.away_team),
                format!("🗓️ {}", match_state.match_date.format("%a %d %b %Y, %H:%M UTC")),
            ],
            SummaryContext::Started => vec![
                format!("{} *{}*", Self::emoji(MatchEventType::Kickoff), Self::title(MatchEventType::Kickoff)),
                format!("*{}* vs *{}* is underway!", match_state.home_team, match_state.away_team),
            ],
            SummaryContext::Finished => vec![
                format!("{} *{}*", Self::emoji(MatchEventType::Fulltime), Self::title(MatchEventType::Fulltime)),
                format!("*{}*", match_state.score_line()),
                result_line(match_state),
            ],
        };
        if let Some(venue) = venue_line(match_state) {
            lines.push(venue);
        }
        self.finish(lines)
    }

    fn finish(&self, mut lines: Vec<String>) -> String {
        if !self.promo_suffix.is_empty() {
            lines.push(String::new());
            lines.push(self.promo_suffix.clone());
        }
        lines.join("\n")
    }
}

fn venue_line(match_state: &Match) -> Option<String> {
    match_state
        .venue
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| format!("📍 {}", v))
}

fn result_line(match_state: &Match) -> String {
    if match_state.home_score > match_state.away_score {
        format!("{} win!", match_state.home_team)
    } else if match_state.away_score > match_state.home_score {
        format!("{} win!", match_state.away_team)
    } else {
        "Honours even.".to_string()
    }
}
