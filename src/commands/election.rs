use chrono::{Duration, Utc};
use dashmap::mapref::entry::Entry;
use tracing::info;

use crate::constants::DEFAULT_TIMEZONE;
use crate::election::{ElectionHandle, ElectionPools, cancel_election, spawn_election_rounds};
use crate::models::{Context, Error};
use crate::utils::datetime::timef;
use crate::utils::timezone::guild_timezone;
use crate::utils::validation::{author_is_guild_owner, require_guild};

/// Start or cancel an automated election
#[poise::command(prefix_command, rename = "election", aliases("startelection"))]
pub async fn election(ctx: Context<'_>, arg: Option<String>) -> Result<(), Error> {
    let guild_id = require_guild(ctx.guild_id())?;
    if !author_is_guild_owner(&ctx) {
        ctx.say("Only the Supreme Leader can use this command").await?;
        return Ok(());
    }

    let cancelling = arg.as_deref().is_some_and(|a| a.eq_ignore_ascii_case("cancel"));

    if cancelling {
        if cancel_election(&ctx.data().elections, guild_id) {
            info!("Election cancelled in guild {}", guild_id);
            ctx.say("Stopping current role change...").await?;
        } else {
            ctx.say("There is no role change currently active").await?;
        }
        return Ok(());
    }

    // Snapshot the guild's configured lists into working copies
    let Some((tz_name, interval_mins, users, roles)) = ctx.data().servers.get(&guild_id).map(|s| {
        (
            s.timezone.clone(),
            s.election_interval_mins,
            s.user_shuffle.clone(),
            s.role_shuffle.clone(),
        )
    }) else {
        ctx.say("This server isn't registered yet").await?;
        return Ok(());
    };

    let interval = Duration::minutes(interval_mins);
    let handle = ElectionHandle::new(Utc::now(), interval);
    let first_result = handle.next_time.with_timezone(&guild_timezone(&tz_name));
    let cancel = handle.cancel.clone();
    info!(
        "Election started in guild {} at {}, first result at {}",
        guild_id, handle.started_at, handle.next_time
    );

    // Register atomically so two concurrent starts can't both spawn a loop
    match ctx.data().elections.entry(guild_id) {
        Entry::Occupied(_) => {
            ctx.say("A role change is already active").await?;
            return Ok(());
        }
        Entry::Vacant(entry) => {
            entry.insert(handle);
        }
    }

    spawn_election_rounds(
        ctx.serenity_context().http.clone(),
        ctx.data().clone(),
        guild_id,
        ctx.channel_id(),
        cancel,
        interval,
        ElectionPools::new(users, roles),
    );

    ctx.say(format!(
        "An election has begun @everyone. The first result will be announced at {}",
        timef(&first_result)
    ))
    .await?;
    Ok(())
}

/// Get the time of the next election result
#[poise::command(prefix_command, aliases("nextelectionresult"))]
pub async fn nextresult(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = require_guild(ctx.guild_id())?;

    let next_time = ctx.data().elections.get(&guild_id).map(|e| e.next_time);
    match next_time {
        Some(next) => {
            let tz_name = ctx
                .data()
                .servers
                .get(&guild_id)
                .map(|s| s.timezone.clone())
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
            let local = next.with_timezone(&guild_timezone(&tz_name));
            ctx.say(format!("The next role change will be at {}", timef(&local)))
                .await?;
        }
        None => {
            ctx.say("There is no role change currently active").await?;
        }
    }
    Ok(())
}
