use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use poise::serenity_prelude as serenity;
use tokio::time::{Duration, sleep};
use tracing::{error, info};

use crate::constants::{ARCHIVE_CATEGORY_NAME, ARCHIVE_FREQUENCY_WEEKS};
use crate::models::Data;
use crate::utils::datetime::{advance_archive_date, wait_until};

use super::archive_general;

/// Start the long-lived archive sweep task
///
/// Exactly one instance runs per process, started from the framework setup
/// hook. Each iteration sleeps until the persisted next-archive date,
/// advances and persists it, then archives the general channel in every
/// connected guild. Per-guild failures are logged and skipped.
pub fn start_archive_scheduler(
    http: Arc<serenity::Http>,
    cache: Arc<serenity::Cache>,
    data: Data,
) {
    tokio::spawn(async move {
        info!("Archive scheduler started");

        loop {
            let next = match data.db.get_next_archive_date().await {
                Ok(Some(next)) => next,
                Ok(None) => {
                    let next =
                        advance_archive_date(Utc::now().naive_utc(), ARCHIVE_FREQUENCY_WEEKS);
                    if let Err(e) = data.db.set_next_archive_date(next).await {
                        error!("Failed to initialize archive schedule: {}", e);
                        sleep(Duration::from_secs(60)).await;
                        continue;
                    }
                    info!("Initialized archive schedule, first sweep at {}", next);
                    next
                }
                Err(e) => {
                    error!("Failed to load archive schedule: {}", e);
                    sleep(Duration::from_secs(60)).await; // Retry in 1 minute
                    continue;
                }
            };

            let wait = wait_until(Utc::now().naive_utc(), next);
            info!(
                "Next archive sweep at {} ({} minutes away)",
                next,
                wait.as_secs() / 60
            );
            sleep(wait).await;

            // Persist the following date before sweeping so a failed sweep
            // doesn't re-run immediately on restart
            let following = advance_archive_date(next, ARCHIVE_FREQUENCY_WEEKS);
            if let Err(e) = data.db.set_next_archive_date(following).await {
                error!("Failed to advance archive date: {}", e);
            }

            let period_start = (next - ChronoDuration::weeks(ARCHIVE_FREQUENCY_WEEKS)).date();
            let period_end = next.date();

            for guild_id in cache.guilds() {
                let guild_name = cache
                    .guild(guild_id)
                    .map(|g| g.name.clone())
                    .unwrap_or_default();

                match archive_general(
                    &http,
                    guild_id,
                    None,
                    ARCHIVE_CATEGORY_NAME,
                    period_start,
                    period_end,
                )
                .await
                {
                    Ok(()) => info!("general archived in '{}' (id: {})", guild_name, guild_id),
                    Err(e) => error!(
                        "there was an error archiving general in '{}' (id: {}): {}",
                        guild_name, guild_id, e
                    ),
                }
            }
        }
    });
}
