pub mod broadcast_formatter;
pub mod error;
pub mod match_engine;
pub mod player_selection;
pub mod role_gate;

pub use broadcast_formatter::{BroadcastFormatter, SummaryContext};
pub use error::MatchError;
pub use match_engine::{EngineOutcome, MatchEventEngine};
pub use role_gate::{OperationKind, RoleGate};
