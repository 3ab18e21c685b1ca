/// Handler modules for Discord events
mod guild;
mod message;
mod voice;

pub use guild::server_info;

use poise::serenity_prelude::{self as serenity, FullEvent};

use crate::models::{Data, Error};

/// Dispatch gateway events to their handlers
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &FullEvent,
    data: &Data,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot } => {
            guild::handle_ready(ctx, data_about_bot, data).await;
        }
        FullEvent::Message { new_message } => {
            message::handle_message(ctx, new_message, data).await;
        }
        FullEvent::GuildCreate { guild, is_new } => {
            guild::handle_guild_create(ctx, guild, *is_new, data).await;
        }
        FullEvent::GuildDelete { incomplete, .. } => {
            guild::handle_guild_delete(incomplete, data).await;
        }
        FullEvent::GuildUpdate { new_data, .. } => {
            guild::handle_guild_update(new_data, data).await;
        }
        FullEvent::GuildMemberAddition { new_member } => {
            guild::handle_member_join(ctx, new_member, data).await;
        }
        FullEvent::VoiceStateUpdate { old, new } => {
            voice::handle_voice_state_update(ctx, old.clone(), new.clone(), data).await;
        }
        _ => {}
    }
    Ok(())
}
