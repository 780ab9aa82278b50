//! Realtime change listener
//!
//! The change triggers read their channel from `app_settings`; the server
//! publishes its configured channel there before LISTENing on it. Each
//! payload (a table name) is forwarded to the query cache. On error the
//! listener waits and reconnects.

use std::time::Duration;

use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tokio::task::JoinHandle;

use crate::cache::QueryCache;

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// `app_settings` key holding the channel the change triggers notify on
pub const CHANNEL_SETTING_KEY: &str = "realtime_channel";

/// Point the change triggers at `channel`
pub async fn publish_channel(pool: &PgPool, channel: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO app_settings (key, value) VALUES ($1, $2)
         ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
    )
    .bind(CHANNEL_SETTING_KEY)
    .bind(channel)
    .execute(pool)
    .await?;
    Ok(())
}

/// Start the listener task
pub fn spawn_listener(pool: PgPool, channel: String, cache: QueryCache) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match listen(&pool, &channel, &cache).await {
                Ok(()) => tracing::warn!("Realtime listener on {channel} stopped, reconnecting"),
                Err(e) => tracing::warn!("⚠️  Realtime listener on {channel} failed: {e}"),
            }
            // Changes may have been missed while disconnected
            cache.clear();
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    })
}

async fn listen(pool: &PgPool, channel: &str, cache: &QueryCache) -> Result<(), sqlx::Error> {
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(channel).await?;
    tracing::info!("📡 Listening for changes on {channel}");

    loop {
        let notification = listener.recv().await?;
        apply_change(cache, notification.payload());
    }
}

/// Invalidate cached queries depending on the changed table
pub fn apply_change(cache: &QueryCache, table: &str) -> usize {
    let table = table.trim();
    if table.is_empty() {
        return 0;
    }
    cache.invalidate_table(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REALTIME_CHANNEL;

    const CHANGE_TRIGGERS: &str =
        include_str!("../../migrations/20260101000002_change_notifications.sql");

    #[test]
    fn test_apply_change_invalidates_by_table() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.put("kpi:unified", &["loans", "funds"], &1);
        assert_eq!(apply_change(&cache, " loans "), 1);
        assert!(cache.is_empty());
        assert_eq!(apply_change(&cache, ""), 0);
    }

    #[test]
    fn test_triggers_notify_on_published_channel() {
        let lookup = format!("WHERE key = '{CHANNEL_SETTING_KEY}'");
        assert!(CHANGE_TRIGGERS.contains(&lookup));
        assert!(CHANGE_TRIGGERS.contains("pg_notify(COALESCE(channel, "));

        // The seeded row and the fallback both match the server default
        let seeded = format!("('{CHANNEL_SETTING_KEY}', '{DEFAULT_REALTIME_CHANNEL}')");
        assert!(CHANGE_TRIGGERS.contains(&seeded));
        let fallback = format!("COALESCE(channel, '{DEFAULT_REALTIME_CHANNEL}')");
        assert!(CHANGE_TRIGGERS.contains(&fallback));
        assert!(!CHANGE_TRIGGERS.contains(&format!("pg_notify('{DEFAULT_REALTIME_CHANNEL}'")));
    }
}
