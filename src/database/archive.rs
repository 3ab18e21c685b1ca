use super::Database;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::Error as SqlxError;

/// Fixed id of the singleton archive schedule row
const ARCHIVE_SCHEDULE_ID: i32 = 1;

impl Database {
    /// Read the next archive date, if one has been scheduled
    ///
    /// Returns None when no row exists yet or the stored fields don't form
    /// a valid date (the scheduler re-initializes in both cases).
    pub async fn get_next_archive_date(&self) -> Result<Option<NaiveDateTime>, SqlxError> {
        let row: Option<(i32, i32, i32, i32, i32, i32)> = sqlx::query_as(
            r#"
            SELECT year, month, day, hour, minute, second
            FROM archive_schedule
            WHERE id = $1
            "#,
        )
        .bind(ARCHIVE_SCHEDULE_ID)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.and_then(|(year, month, day, hour, minute, second)| {
            NaiveDate::from_ymd_opt(year, month as u32, day as u32)?
                .and_hms_opt(hour as u32, minute as u32, second as u32)
        }))
    }

    /// Persist the next archive date as split integer fields
    pub async fn set_next_archive_date(&self, when: NaiveDateTime) -> Result<(), SqlxError> {
        use chrono::{Datelike, Timelike};

        sqlx::query(
            r#"
            INSERT INTO archive_schedule (id, year, month, day, hour, minute, second)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id)
            DO UPDATE SET year = $2, month = $3, day = $4,
                          hour = $5, minute = $6, second = $7
            "#,
        )
        .bind(ARCHIVE_SCHEDULE_ID)
        .bind(when.year())
        .bind(when.month() as i32)
        .bind(when.day() as i32)
        .bind(when.hour() as i32)
        .bind(when.minute() as i32)
        .bind(when.second() as i32)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
