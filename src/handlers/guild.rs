use chrono::Utc;
use poise::serenity_prelude::{
    self as serenity, Guild, GuildId, Member, PartialGuild, Ready, UnavailableGuild, UserId,
};
use tracing::{error, info, warn};

use crate::database::ServerInfo;
use crate::election::cancel_election;
use crate::models::{Data, ServerState};

/// Build runtime state for every guild already in the cache
pub async fn handle_ready(ctx: &serenity::Context, ready: &Ready, data: &Data) {
    for guild_id in ctx.cache.guilds() {
        ensure_server_state(ctx, data, guild_id).await;
    }
    info!(
        "{} active in {} server(s)",
        ready.user.name,
        data.servers.len()
    );
}

/// A guild became available, either at startup or via a real join
pub async fn handle_guild_create(
    ctx: &serenity::Context,
    guild: &Guild,
    is_new: Option<bool>,
    data: &Data,
) {
    ensure_server_state(ctx, data, guild.id).await;

    if is_new == Some(true) {
        info!("Joined guild '{}' (id: {})", guild.name, guild.id);
    }

    match data.db.log_server(&server_info(guild)).await {
        Ok(created) => {
            if created {
                info!("Logged guild '{}' into the database", guild.name);
            }
        }
        Err(e) => error!("Failed to log guild {} to database: {}", guild.id, e),
    }
}

/// The bot was removed from a guild; drop its runtime state and records
pub async fn handle_guild_delete(incomplete: &UnavailableGuild, data: &Data) {
    // An outage marks the guild unavailable without removing the bot
    if incomplete.unavailable {
        return;
    }

    let guild_id = incomplete.id;
    data.servers.remove(&guild_id);
    cancel_election(&data.elections, guild_id);

    match data.db.remove_server(guild_id).await {
        Ok(deleted) => info!(
            "Removed from guild {}, {} rows deleted from database",
            guild_id, deleted
        ),
        Err(e) => error!("Failed to remove guild {} from database: {}", guild_id, e),
    }
}

/// A guild's information changed; refresh its record
pub async fn handle_guild_update(new_data: &PartialGuild, data: &Data) {
    if let Err(e) = data.db.log_server(&partial_server_info(new_data)).await {
        error!("Failed to update guild {} in database: {}", new_data.id, e);
    } else {
        info!("Guild {} was updated", new_data.id);
    }
}

/// A member joined; create their stats row so voice handlers can rely on it
pub async fn handle_member_join(ctx: &serenity::Context, member: &Member, data: &Data) {
    let guild_name = ctx
        .cache
        .guild(member.guild_id)
        .map(|g| g.name.clone())
        .unwrap_or_default();

    if let Err(e) = data
        .db
        .create_user_stats(member.guild_id, member.user.id, &guild_name, &member.user.name)
        .await
    {
        error!(
            "Failed to create stats row for user {} in guild {}: {}",
            member.user.id, member.guild_id, e
        );
    }

    // New members also join the election pool
    if !member.user.bot
        && let Some(mut state) = data.servers.get_mut(&member.guild_id)
        && !state.user_shuffle.contains(&member.user.id)
    {
        state.user_shuffle.push(member.user.id);
    }
}

/// Create the guild's runtime state if it doesn't exist yet
///
/// Settings come from the database; the election user pool is seeded from
/// the guild's cached non-bot members.
pub async fn ensure_server_state(ctx: &serenity::Context, data: &Data, guild_id: GuildId) {
    if data.servers.contains_key(&guild_id) {
        return;
    }

    let settings = match data.db.get_guild_settings(guild_id).await {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Failed to load settings for guild {}: {}", guild_id, e);
            Default::default()
        }
    };

    let user_shuffle: Vec<UserId> = ctx
        .cache
        .guild(guild_id)
        .map(|g| {
            g.members
                .iter()
                .filter(|(_, m)| !m.user.bot)
                .map(|(id, _)| *id)
                .collect()
        })
        .unwrap_or_default();

    let mut state = ServerState::new(user_shuffle);
    state.timezone = settings.timezone;
    state.election_interval_mins = settings.election_interval_mins;
    data.servers.insert(guild_id, state);
}

/// Guild metadata for the connected_servers table
pub fn server_info(guild: &Guild) -> ServerInfo {
    ServerInfo {
        guild_id: guild.id,
        name: guild.name.clone(),
        description: guild.description.clone().unwrap_or_default(),
        icon_url: guild.icon_url().unwrap_or_default(),
        created_at: Some(guild.id.created_at().with_timezone(&Utc)),
    }
}

fn partial_server_info(guild: &PartialGuild) -> ServerInfo {
    ServerInfo {
        guild_id: guild.id,
        name: guild.name.clone(),
        description: guild.description.clone().unwrap_or_default(),
        icon_url: guild.icon_url().unwrap_or_default(),
        created_at: Some(guild.id.created_at().with_timezone(&Utc)),
    }
}
