use std::sync::Arc;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::Client as RedisClient;
use thiserror::Error as ThisError;

use crate::models::match_events::{MatchFeedEvent, NotificationTarget};

#[derive(Debug, ThisError)]
pub enum PublishError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Delivers formatted broadcasts to subscribers. Delivery is best effort:
/// callers log failures and never roll back the match operation.
#[async_trait]
pub trait BroadcastPublisher: Send + Sync {
    async fn publish(&self, target: &NotificationTarget, event: &MatchFeedEvent) -> Result<(), PublishError>;
}

/// Publishes to Redis pub/sub. Every message also goes to the match's own
/// channel so live screens of that match can follow along.
#[derive(Clone, Debug)]
pub struct RedisBroadcastPublisher {
    client: Arc<RedisClient>,
}

impl RedisBroadcastPublisher {
    pub fn new(client: Arc<RedisClient>) -> Self {
        Self { client }
    }

    pub fn match_channel(event: &MatchFeedEvent) -> String {
        format!("match:events:match:{}", event.match_id())
    }
}

#[async_trait]
impl BroadcastPublisher for RedisBroadcastPublisher {
    async fn publish(&self, target: &NotificationTarget, event: &MatchFeedEvent) -> Result<(), PublishError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let message = serde_json::to_string(event)?;

        let target_channel = target.channel();
        conn.publish::<_, _, ()>(&target_channel, &message).await?;

        let match_channel = Self::match_channel(event);
        conn.publish::<_, _, ()>(&match_channel, &message).await?;

        tracing::info!(
            "📢 Published match {} broadcast to {} and {}",
            event.match_id(),
            target_channel,
            match_channel
        );
        Ok(())
    }
}
