//! Redis store implementation using bb8 connection pool.

use std::time::Duration;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};

use crate::config::RedisConfig;
use crate::error::{CacheError, CacheResult};
use crate::store::Store;

type RedisPool = Pool<Client>;

/// Expiry argument for SET-family commands.
#[derive(Debug, PartialEq, Eq)]
enum Expiry {
    Seconds(u64),
    Millis(u64),
}

/// A zero duration means no expiry. Durations with a sub-second
/// component use PX so a short ttl is not truncated to zero seconds.
fn expiry_for(ttl: Duration) -> Option<Expiry> {
    if ttl.is_zero() {
        None
    } else if ttl.subsec_nanos() == 0 {
        Some(Expiry::Seconds(ttl.as_secs()))
    } else {
        Some(Expiry::Millis(ttl.as_millis() as u64))
    }
}

/// Redis-backed cache store.
///
/// Holds only an immutable key prefix and a connection pool; all cache
/// contents live in the server, so dropping and reconstructing the
/// store has no effect on stored data. Cloning is cheap and clones
/// share the pool.
#[derive(Clone)]
pub struct RedisStore {
    pool: RedisPool,
    prefix: String,
}

impl RedisStore {
    /// Connect to the server described by `config`.
    ///
    /// The server is pinged once; an unreachable server fails
    /// construction with [`CacheError::Connection`]. This is the only
    /// fatal initialization failure.
    pub async fn connect(config: RedisConfig) -> Result<Self, CacheError> {
        config.validate()?;

        let client =
            Client::open(config.url().as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(Duration::from_secs(config.connect_timeout))
            .build(client)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        let store = Self {
            pool,
            prefix: config.prefix,
        };
        store.ping().await?;

        tracing::debug!(prefix = %store.prefix, "connected to redis cache store");
        Ok(store)
    }

    /// The prefix prepended to every logical key.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn prefixed_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    async fn get_conn(&self) -> Result<PooledConnection<'_, Client>, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.get_conn().await?;

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let _pong: String = redis::cmd("PING")
            .query_async(conn_ref)
            .await
            .map_err(|e: RedisError| CacheError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let found: bool = conn_ref
            .exists(&prefixed)
            .await
            .map_err(|e: RedisError| CacheError::Operation(e.to_string()))?;

        Ok(found)
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<bool> {
        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        match expiry_for(ttl) {
            None => conn_ref
                .set_nx::<_, _, bool>(&prefixed, value)
                .await
                .map_err(|e| CacheError::Operation(e.to_string())),
            Some(expiry) => {
                let mut cmd = redis::cmd("SET");
                cmd.arg(&prefixed).arg(value).arg("NX");
                match expiry {
                    Expiry::Seconds(secs) => {
                        cmd.arg("EX").arg(secs);
                    }
                    Expiry::Millis(millis) => {
                        cmd.arg("PX").arg(millis);
                    }
                }

                // SET NX replies Okay when the key was set, Nil otherwise.
                let reply: redis::Value = cmd
                    .query_async(conn_ref)
                    .await
                    .map_err(|e: RedisError| CacheError::Operation(e.to_string()))?;
                Ok(matches!(reply, redis::Value::Okay))
            }
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        conn_ref
            .del::<_, ()>(&prefixed)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn flush_all(&self) -> CacheResult<bool> {
        let mut conn = self.get_conn().await?;

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        let status: String = redis::cmd("FLUSHALL")
            .query_async(conn_ref)
            .await
            .map_err(|e: RedisError| CacheError::Operation(e.to_string()))?;

        Ok(status == "OK")
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn fetch(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        conn_ref
            .get(&prefixed)
            .await
            .map_err(|e: RedisError| CacheError::Operation(e.to_string()))
    }

    async fn has(&self, key: &str) -> bool {
        match self.exists(key).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, key, "existence check failed");
                false
            }
        }
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.get_conn().await?;
        let prefixed = self.prefixed_key(key);

        let conn_ref: &mut MultiplexedConnection = &mut conn;
        match expiry_for(ttl) {
            None => conn_ref.set::<_, _, ()>(&prefixed, value).await,
            Some(Expiry::Seconds(secs)) => {
                conn_ref.set_ex::<_, _, ()>(&prefixed, value, secs).await
            }
            Some(Expiry::Millis(millis)) => {
                let set: Result<(), RedisError> = redis::cmd("SET")
                    .arg(&prefixed)
                    .arg(value)
                    .arg("PX")
                    .arg(millis)
                    .query_async(conn_ref)
                    .await;
                set
            }
        }
        .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn add(&self, key: &str, value: &str, ttl: Duration) -> bool {
        match self.set_if_absent(key, value, ttl).await {
            Ok(acquired) => acquired,
            Err(e) => {
                tracing::warn!(error = %e, key, "set-if-absent failed");
                false
            }
        }
    }

    async fn forget(&self, key: &str) -> bool {
        match self.delete(key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, key, "delete failed");
                false
            }
        }
    }

    async fn flush(&self) -> bool {
        match self.flush_all().await {
            Ok(acknowledged) => acknowledged,
            Err(e) => {
                tracing::warn!(error = %e, "flush failed");
                false
            }
        }
    }
}
