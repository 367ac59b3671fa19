pub mod common;
pub mod live_match;
pub mod match_events;
pub mod player;
pub mod user;
