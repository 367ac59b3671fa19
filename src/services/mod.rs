pub mod broadcast_publisher;
pub mod live_match_service;
pub mod redis_service;

pub use broadcast_publisher::{BroadcastPublisher, PublishError, RedisBroadcastPublisher};
pub use live_match_service::{LiveMatchError, LiveMatchService};
pub use redis_service::RedisService;
