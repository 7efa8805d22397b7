use redis::AsyncCommands;
use redis::Client;

use crate::db::store::{PreferenceKey, PreferenceStore};
use crate::error::AppResult;

/// Namespace prepended to every preference key
const KEY_PREFIX: &str = "cinefind:pref:";

/// Creates a Redis client for preference storage
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Preference store backed by Redis string keys without expiry
#[derive(Clone)]
pub struct RedisPreferenceStore {
    redis_client: Client,
}

impl RedisPreferenceStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }

    fn redis_key(key: PreferenceKey) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }
}

#[async_trait::async_trait]
impl PreferenceStore for RedisPreferenceStore {
    async fn get(&self, key: PreferenceKey) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(Self::redis_key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: PreferenceKey, value: &str) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(Self::redis_key(key), value).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
