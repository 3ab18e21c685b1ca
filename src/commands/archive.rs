use chrono::{Duration, Utc};

use crate::constants::{ARCHIVE_CATEGORY_NAME, ARCHIVE_FREQUENCY_WEEKS};
use crate::models::{Context, Error};
use crate::utils::validation::{author_is_guild_owner, require_guild};

/// Manually run the archive routine for this server
#[poise::command(prefix_command, rename = "archivegeneral", aliases("archive"))]
pub async fn archive_general(
    ctx: Context<'_>,
    general_cat_name: Option<String>,
    archive_cat_name: Option<String>,
    freq: Option<i64>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx.guild_id())?;
    if !author_is_guild_owner(&ctx) {
        ctx.say("Only the owner can use this command").await?;
        return Ok(());
    }

    let freq_weeks = freq.unwrap_or(ARCHIVE_FREQUENCY_WEEKS);
    let archive_cat = archive_cat_name.unwrap_or_else(|| ARCHIVE_CATEGORY_NAME.to_string());

    // The archived name covers the period ending at the scheduled date, or
    // today when nothing is scheduled yet
    let period_end = match ctx.data().db.get_next_archive_date().await? {
        Some(next) => next.date(),
        None => Utc::now().date_naive(),
    };
    let period_start = period_end - Duration::weeks(freq_weeks);

    match crate::archive::archive_general(
        ctx.http(),
        guild_id,
        general_cat_name.as_deref(),
        &archive_cat,
        period_start,
        period_end,
    )
    .await
    {
        Ok(()) => {
            ctx.say("general has been archived").await?;
        }
        Err(e) => {
            ctx.say(format!("Couldn't archive general: {}", e)).await?;
        }
    }
    Ok(())
}

/// Get the date of the next general chat archive
#[poise::command(prefix_command, aliases("nextarchive"))]
pub async fn nextarchivedate(ctx: Context<'_>) -> Result<(), Error> {
    match ctx.data().db.get_next_archive_date().await? {
        Some(next) => {
            ctx.say(format!("Next archive date: {}", next)).await?;
        }
        None => {
            ctx.say("No archive is currently scheduled").await?;
        }
    }
    Ok(())
}
