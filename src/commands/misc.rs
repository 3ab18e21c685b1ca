use chrono::Utc;

use crate::constants::DEFAULT_TIMEZONE;
use crate::handlers::server_info;
use crate::models::{Context, Error};
use crate::utils::datetime::timef;
use crate::utils::timezone::guild_timezone;
use crate::utils::validation::{ValidationError, author_is_guild_owner, require_guild};

/// Stupid command that just sends 'bruh'
#[poise::command(prefix_command)]
pub async fn bruh(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("bruh").await?;
    Ok(())
}

/// Repeat back the command arguments
#[poise::command(prefix_command, aliases("say"))]
pub async fn echo(ctx: Context<'_>, #[rest] words: Option<String>) -> Result<(), Error> {
    let message = words.unwrap_or_default();
    if !message.is_empty() {
        ctx.say(message).await?;
    }
    Ok(())
}

/// Manually log this server into the database
#[poise::command(prefix_command, aliases("intodb"))]
pub async fn intodatabase(ctx: Context<'_>) -> Result<(), Error> {
    require_guild(ctx.guild_id())?;
    if !author_is_guild_owner(&ctx) {
        ctx.say("Only the owner can use this command").await?;
        return Ok(());
    }

    // Scope the cache guard so it drops before the await
    let info = {
        let guild = ctx.guild().ok_or(ValidationError::NotInGuild)?;
        server_info(&guild)
    };

    let created = ctx.data().db.log_server(&info).await?;
    if created {
        ctx.say("Logged this server into the database").await?;
    } else {
        ctx.say("Updated this server in database").await?;
    }
    Ok(())
}

/// Get the current datetime in this server's timezone
#[poise::command(prefix_command, rename = "datetime", aliases("date", "time"))]
pub async fn datetime(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = require_guild(ctx.guild_id())?;

    let tz_name = ctx
        .data()
        .servers
        .get(&guild_id)
        .map(|s| s.timezone.clone())
        .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());

    let now = Utc::now().with_timezone(&guild_timezone(&tz_name));
    ctx.say(format!("It is {}, {}", now.date_naive(), timef(&now)))
        .await?;
    Ok(())
}

/// Command reserved for testing purposes
#[poise::command(prefix_command)]
pub async fn test(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Boi what you tryna test 🫱").await?;
    Ok(())
}
