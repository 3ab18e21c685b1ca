use super::Database;
use poise::serenity_prelude::GuildId;
use sqlx::Error as SqlxError;

use crate::constants::{DEFAULT_ELECTION_INTERVAL_MINS, DEFAULT_TIMEZONE};

/// Configurable per-guild settings, with defaults when unset
#[derive(Clone, Debug)]
pub struct GuildSettings {
    pub timezone: String,
    pub election_interval_mins: i64,
}

impl Default for GuildSettings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            election_interval_mins: DEFAULT_ELECTION_INTERVAL_MINS,
        }
    }
}

impl Database {
    /// Get settings for a guild (defaults if not configured)
    pub async fn get_guild_settings(&self, guild_id: GuildId) -> Result<GuildSettings, SqlxError> {
        let row: Option<(String, i32)> = sqlx::query_as(
            "SELECT timezone, election_interval_minutes FROM guild_settings WHERE guild_id = $1",
        )
        .bind(guild_id.get() as i64)
        .fetch_optional(self.pool())
        .await?;

        Ok(row
            .map(|(timezone, interval)| GuildSettings {
                timezone,
                election_interval_mins: interval as i64,
            })
            .unwrap_or_default())
    }
}
