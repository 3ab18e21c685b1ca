use super::Database;
use sqlx::Error as SqlxError;

impl Database {
    /// Run database migrations to create tables
    pub(super) async fn run_migrations(&self) -> Result<(), SqlxError> {
        self.create_user_stats_table().await?;
        self.create_connected_servers_table().await?;
        self.create_archive_schedule_table().await?;
        self.create_guild_settings_table().await?;
        Ok(())
    }

    async fn create_user_stats_table(&self) -> Result<(), SqlxError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_stats (
                guild_id BIGINT NOT NULL,
                user_id BIGINT NOT NULL,
                guild_name TEXT NOT NULL DEFAULT '',
                user_name TEXT NOT NULL DEFAULT '',
                sent_messages BIGINT NOT NULL DEFAULT 0,
                mentioned BIGINT NOT NULL DEFAULT 0,
                time_in_vc BIGINT NOT NULL DEFAULT 0,
                connected_to_vc BOOLEAN NOT NULL DEFAULT FALSE,
                vc_timer BOOLEAN NOT NULL DEFAULT FALSE,
                last_connected_to_vc TIMESTAMPTZ,
                PRIMARY KEY (guild_id, user_id)
            )
            "#,
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn create_connected_servers_table(&self) -> Result<(), SqlxError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS connected_servers (
                guild_id BIGINT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                icon_url TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMPTZ,
                joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                last_updated TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn create_archive_schedule_table(&self) -> Result<(), SqlxError> {
        // Single row keyed by a fixed id; the date is stored as split
        // integer fields rather than one timestamp
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS archive_schedule (
                id INTEGER PRIMARY KEY,
                year INTEGER NOT NULL,
                month INTEGER NOT NULL,
                day INTEGER NOT NULL,
                hour INTEGER NOT NULL,
                minute INTEGER NOT NULL,
                second INTEGER NOT NULL
            )
            "#,
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn create_guild_settings_table(&self) -> Result<(), SqlxError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guild_settings (
                guild_id BIGINT PRIMARY KEY,
                timezone TEXT NOT NULL DEFAULT 'UTC',
                election_interval_minutes INTEGER NOT NULL DEFAULT 60,
                created_at TIMESTAMP NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMP NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
