use poise::serenity_prelude::{self as serenity, Message};
use tracing::error;

use crate::models::Data;

/// Record message stats: one sent-message for the author, one mention for
/// each mentioned user other than the author
pub async fn handle_message(ctx: &serenity::Context, message: &Message, data: &Data) {
    let Some(guild_id) = message.guild_id else {
        return;
    };

    let guild_name = message
        .guild(&ctx.cache)
        .map(|g| g.name.clone())
        .unwrap_or_default();

    if let Err(e) = data
        .db
        .inc_sent_messages(guild_id, message.author.id, &guild_name, &message.author.name)
        .await
    {
        error!(
            "Failed to log sent message for user {} in guild {}: {}",
            message.author.id, guild_id, e
        );
    }

    for user in &message.mentions {
        if user.id == message.author.id {
            continue;
        }
        if let Err(e) = data
            .db
            .inc_mentioned(guild_id, user.id, &guild_name, &user.name)
            .await
        {
            error!(
                "Failed to log mention of user {} in guild {}: {}",
                user.id, guild_id, e
            );
        }
    }
}
