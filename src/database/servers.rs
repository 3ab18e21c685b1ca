use super::Database;
use chrono::{DateTime, Utc};
use poise::serenity_prelude::GuildId;
use sqlx::Error as SqlxError;

/// Guild metadata logged into the connected_servers table
#[derive(Clone, Debug)]
pub struct ServerInfo {
    pub guild_id: GuildId,
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// What a log_server call does for a guild
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ServerUpsert {
    /// First sighting: insert the record and stamp joined_at
    Create,
    /// Already known: refresh the metadata, keep the original joined_at
    Refresh,
}

pub(crate) fn plan_upsert(already_logged: bool) -> ServerUpsert {
    if already_logged {
        ServerUpsert::Refresh
    } else {
        ServerUpsert::Create
    }
}

impl Database {
    /// Insert or update a guild's record
    ///
    /// Returns true if a new record was created, false if an existing one
    /// was updated. The joined_at timestamp is only set on first insert.
    pub async fn log_server(&self, info: &ServerInfo) -> Result<bool, SqlxError> {
        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT guild_id FROM connected_servers WHERE guild_id = $1")
                .bind(info.guild_id.get() as i64)
                .fetch_optional(self.pool())
                .await?;

        match plan_upsert(existing.is_some()) {
            ServerUpsert::Refresh => {
                sqlx::query(
                    r#"
                    UPDATE connected_servers
                    SET name = $2, description = $3, icon_url = $4, created_at = $5,
                        last_updated = NOW()
                    WHERE guild_id = $1
                    "#,
                )
                .bind(info.guild_id.get() as i64)
                .bind(&info.name)
                .bind(&info.description)
                .bind(&info.icon_url)
                .bind(info.created_at)
                .execute(self.pool())
                .await?;
                Ok(false)
            }
            ServerUpsert::Create => {
                sqlx::query(
                    r#"
                    INSERT INTO connected_servers (guild_id, name, description, icon_url, created_at)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(info.guild_id.get() as i64)
                .bind(&info.name)
                .bind(&info.description)
                .bind(&info.icon_url)
                .bind(info.created_at)
                .execute(self.pool())
                .await?;
                Ok(true)
            }
        }
    }

    /// Remove a guild from all relevant tables, returning the number of
    /// rows deleted
    pub async fn remove_server(&self, guild_id: GuildId) -> Result<u64, SqlxError> {
        let servers = sqlx::query("DELETE FROM connected_servers WHERE guild_id = $1")
            .bind(guild_id.get() as i64)
            .execute(self.pool())
            .await?;

        let stats = sqlx::query("DELETE FROM user_stats WHERE guild_id = $1")
            .bind(guild_id.get() as i64)
            .execute(self.pool())
            .await?;

        Ok(servers.rows_affected() + stats.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory mirror of a connected_servers row
    #[derive(Clone, Debug)]
    struct Row {
        name: String,
        joined_at: DateTime<Utc>,
    }

    /// Mirror of log_server against a map, returning whether a record was
    /// created
    fn log(rows: &mut HashMap<GuildId, Row>, info: &ServerInfo, now: DateTime<Utc>) -> bool {
        match plan_upsert(rows.contains_key(&info.guild_id)) {
            ServerUpsert::Create => {
                rows.insert(
                    info.guild_id,
                    Row {
                        name: info.name.clone(),
                        joined_at: now,
                    },
                );
                true
            }
            ServerUpsert::Refresh => {
                let row = rows.get_mut(&info.guild_id).unwrap();
                row.name = info.name.clone();
                // joined_at untouched
                false
            }
        }
    }

    fn info(guild_id: u64, name: &str) -> ServerInfo {
        ServerInfo {
            guild_id: GuildId::new(guild_id),
            name: name.to_string(),
            description: String::new(),
            icon_url: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_log_server_idempotent() {
        let mut rows = HashMap::new();
        let first_seen = Utc::now();

        assert!(log(&mut rows, &info(1, "walrus den"), first_seen));
        assert_eq!(rows.len(), 1);

        // Logging the same guild again updates in place
        let later = first_seen + chrono::TimeDelta::days(3);
        assert!(!log(&mut rows, &info(1, "walrus den (renamed)"), later));
        assert_eq!(rows.len(), 1);

        let row = &rows[&GuildId::new(1)];
        assert_eq!(row.name, "walrus den (renamed)");
        assert_eq!(row.joined_at, first_seen, "joined_at must survive updates");
    }

    #[test]
    fn test_distinct_guilds_get_distinct_records() {
        let mut rows = HashMap::new();
        let now = Utc::now();
        assert!(log(&mut rows, &info(1, "a"), now));
        assert!(log(&mut rows, &info(2, "b"), now));
        assert_eq!(rows.len(), 2);
    }
}
