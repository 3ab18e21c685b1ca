use chrono::Utc;
use poise::serenity_prelude::{self as serenity, ChannelId, GuildId, UserId, VoiceState};
use tracing::error;

use crate::database::Database;
use crate::models::{Data, Error};
use crate::utils::session::{self, Presence, StatUpdate};
use crate::utils::validation::ValidationError;

/// Handle voice state updates (user joins/leaves/moves voice channels)
///
/// A move between channels decomposes into a leave from the old channel
/// followed by a join to the new one. Updates within the same channel
/// (mute, deafen) are ignored.
pub async fn handle_voice_state_update(
    ctx: &serenity::Context,
    old_state: Option<VoiceState>,
    new_state: VoiceState,
    data: &Data,
) {
    let Some(guild_id) = new_state.guild_id else {
        return;
    };
    let user_id = new_state.user_id;

    let old_channel = old_state.as_ref().and_then(|s| s.channel_id);
    let new_channel = new_state.channel_id;
    if old_channel == new_channel {
        return;
    }

    if let Some(channel_id) = old_channel
        && let Err(e) = handle_channel_left(ctx, data, guild_id, user_id, channel_id).await
    {
        error!(
            "Failed to record voice leave for user {} in guild {}: {}",
            user_id, guild_id, e
        );
    }

    if let Some(channel_id) = new_channel
        && let Err(e) = handle_channel_joined(ctx, data, guild_id, user_id, channel_id).await
    {
        error!(
            "Failed to record voice join for user {} in guild {}: {}",
            user_id, guild_id, e
        );
    }
}

/// A user joined a voice channel
async fn handle_channel_joined(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: GuildId,
    user_id: UserId,
    channel_id: ChannelId,
) -> Result<(), Error> {
    let members = channel_presences(ctx, channel_id).await?;
    let updates = session::on_join(user_id, &members, Utc::now());
    apply_updates(&data.db, guild_id, &updates).await?;
    Ok(())
}

/// A user left a voice channel
///
/// The leaver's stats row must exist (created at member join); a missing
/// row surfaces as `RowNotFound` rather than being silently defaulted.
async fn handle_channel_left(
    ctx: &serenity::Context,
    data: &Data,
    guild_id: GuildId,
    user_id: UserId,
    channel_id: ChannelId,
) -> Result<(), Error> {
    let now = Utc::now();
    let stats = data.db.get_voice_stats(guild_id, user_id).await?;
    let session_secs = stats
        .last_connected_to_vc
        .map(|connected_at| session::session_seconds(connected_at, now))
        .unwrap_or(0);

    // The cache is updated before dispatch, so this is post-leave membership
    let remaining = channel_presences(ctx, channel_id).await?;
    let straggler = if remaining.len() == 1 {
        let presence = remaining[0];
        let straggler_stats = data.db.get_voice_stats(guild_id, presence.user_id).await?;
        Some((presence.user_id, straggler_stats.vc_timer))
    } else {
        None
    };

    let updates = session::on_leave(user_id, stats.vc_timer, session_secs, straggler);
    apply_updates(&data.db, guild_id, &updates).await?;
    Ok(())
}

/// Snapshot the members currently in a voice channel
async fn channel_presences(
    ctx: &serenity::Context,
    channel_id: ChannelId,
) -> Result<Vec<Presence>, Error> {
    let channel = channel_id.to_channel(ctx).await?;
    let guild_channel = channel.guild().ok_or(ValidationError::NotAGuildChannel)?;
    let members = guild_channel.members(ctx)?;

    Ok(members
        .iter()
        .map(|m| Presence {
            user_id: m.user.id,
            is_bot: m.user.bot,
        })
        .collect())
}

/// Apply stat updates to the database in order
///
/// One failing update must not drop the rest of the batch: a missing row
/// for one member would otherwise leave every member after it un-updated.
/// Every update is attempted; the first error is returned afterwards.
async fn apply_updates(
    db: &Database,
    guild_id: GuildId,
    updates: &[StatUpdate],
) -> Result<(), sqlx::Error> {
    let mut first_error = None;
    for update in updates {
        let result = match *update {
            StatUpdate::Connected { user_id, at } => db.mark_connected(guild_id, user_id, at).await,
            StatUpdate::TimerRunning { user_id, running } => {
                db.set_vc_timer(guild_id, user_id, running).await
            }
            StatUpdate::CreditTime { user_id, seconds } => {
                db.credit_vc_time(guild_id, user_id, seconds).await
            }
            StatUpdate::Disconnected { user_id } => db.mark_disconnected(guild_id, user_id).await,
        };
        if let Err(e) = result {
            error!("Failed to apply {:?} in guild {}: {}", update, guild_id, e);
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
