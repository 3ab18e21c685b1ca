use super::Database;
use chrono::{DateTime, Utc};
use poise::serenity_prelude::{GuildId, UserId};
use sqlx::Error as SqlxError;

/// Voice-tracking fields of a user's stats row
#[derive(Clone, Debug)]
pub struct VoiceStats {
    pub connected_to_vc: bool,
    pub vc_timer: bool,
    pub last_connected_to_vc: Option<DateTime<Utc>>,
    pub time_in_vc: i64,
}

impl Database {
    /// Create a stats row for a user if one doesn't exist yet
    ///
    /// Voice handlers assume the row is present, so this runs on member join.
    pub async fn create_user_stats(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        guild_name: &str,
        user_name: &str,
    ) -> Result<(), SqlxError> {
        sqlx::query(
            r#"
            INSERT INTO user_stats (guild_id, user_id, guild_name, user_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (guild_id, user_id) DO NOTHING
            "#,
        )
        .bind(guild_id.get() as i64)
        .bind(user_id.get() as i64)
        .bind(guild_name)
        .bind(user_name)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Increment a user's sent-message counter, creating the row if needed
    pub async fn inc_sent_messages(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        guild_name: &str,
        user_name: &str,
    ) -> Result<(), SqlxError> {
        sqlx::query(
            r#"
            INSERT INTO user_stats (guild_id, user_id, guild_name, user_name, sent_messages)
            VALUES ($1, $2, $3, $4, 1)
            ON CONFLICT (guild_id, user_id)
            DO UPDATE SET sent_messages = user_stats.sent_messages + 1,
                          guild_name = $3, user_name = $4
            "#,
        )
        .bind(guild_id.get() as i64)
        .bind(user_id.get() as i64)
        .bind(guild_name)
        .bind(user_name)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Increment a user's mention counter, creating the row if needed
    pub async fn inc_mentioned(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        guild_name: &str,
        user_name: &str,
    ) -> Result<(), SqlxError> {
        sqlx::query(
            r#"
            INSERT INTO user_stats (guild_id, user_id, guild_name, user_name, mentioned)
            VALUES ($1, $2, $3, $4, 1)
            ON CONFLICT (guild_id, user_id)
            DO UPDATE SET mentioned = user_stats.mentioned + 1,
                          guild_name = $3, user_name = $4
            "#,
        )
        .bind(guild_id.get() as i64)
        .bind(user_id.get() as i64)
        .bind(guild_name)
        .bind(user_name)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Fetch the voice-tracking fields for a user
    ///
    /// Returns `RowNotFound` when the row is missing; callers treat that as
    /// a contract violation rather than defaulting.
    pub async fn get_voice_stats(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<VoiceStats, SqlxError> {
        let (connected_to_vc, vc_timer, last_connected_to_vc, time_in_vc): (
            bool,
            bool,
            Option<DateTime<Utc>>,
            i64,
        ) = sqlx::query_as(
            r#"
            SELECT connected_to_vc, vc_timer, last_connected_to_vc, time_in_vc
            FROM user_stats
            WHERE guild_id = $1 AND user_id = $2
            "#,
        )
        .bind(guild_id.get() as i64)
        .bind(user_id.get() as i64)
        .fetch_one(self.pool())
        .await?;

        Ok(VoiceStats {
            connected_to_vc,
            vc_timer,
            last_connected_to_vc,
            time_in_vc,
        })
    }

    /// Record that a user connected to a voice channel
    pub async fn mark_connected(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), SqlxError> {
        let result = sqlx::query(
            r#"
            UPDATE user_stats
            SET connected_to_vc = TRUE, last_connected_to_vc = $3
            WHERE guild_id = $1 AND user_id = $2
            "#,
        )
        .bind(guild_id.get() as i64)
        .bind(user_id.get() as i64)
        .bind(at)
        .execute(self.pool())
        .await?;

        require_row(result.rows_affected())
    }

    /// Record that a user disconnected, clearing both voice flags
    pub async fn mark_disconnected(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<(), SqlxError> {
        let result = sqlx::query(
            r#"
            UPDATE user_stats
            SET connected_to_vc = FALSE, vc_timer = FALSE
            WHERE guild_id = $1 AND user_id = $2
            "#,
        )
        .bind(guild_id.get() as i64)
        .bind(user_id.get() as i64)
        .execute(self.pool())
        .await?;

        require_row(result.rows_affected())
    }

    /// Set whether a user's shared voice timer is running
    pub async fn set_vc_timer(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        running: bool,
    ) -> Result<(), SqlxError> {
        let result = sqlx::query(
            r#"
            UPDATE user_stats
            SET vc_timer = $3
            WHERE guild_id = $1 AND user_id = $2
            "#,
        )
        .bind(guild_id.get() as i64)
        .bind(user_id.get() as i64)
        .bind(running)
        .execute(self.pool())
        .await?;

        require_row(result.rows_affected())
    }

    /// Add elapsed session seconds to a user's cumulative voice time
    pub async fn credit_vc_time(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        seconds: i64,
    ) -> Result<(), SqlxError> {
        let result = sqlx::query(
            r#"
            UPDATE user_stats
            SET time_in_vc = time_in_vc + $3
            WHERE guild_id = $1 AND user_id = $2
            "#,
        )
        .bind(guild_id.get() as i64)
        .bind(user_id.get() as i64)
        .bind(seconds)
        .execute(self.pool())
        .await?;

        require_row(result.rows_affected())
    }
}

/// Map an update that matched no row to `RowNotFound`
fn require_row(rows_affected: u64) -> Result<(), SqlxError> {
    if rows_affected == 0 {
        Err(SqlxError::RowNotFound)
    } else {
        Ok(())
    }
}
