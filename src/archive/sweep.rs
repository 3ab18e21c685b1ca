use chrono::NaiveDate;
use poise::serenity_prelude::{self as serenity, ChannelType, CreateChannel, EditChannel, GuildId};
use tracing::info;

use crate::constants::GENERAL_CHANNEL_NAME;
use crate::models::Error;
use crate::utils::datetime::archived_channel_name;

/// Errors while archiving a guild's general channel
#[derive(Debug)]
pub enum ArchiveError {
    GeneralChannelNotFound,
    ArchiveCategoryNotFound(String),
}

impl std::fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveError::GeneralChannelNotFound => {
                write!(f, "No '{}' text channel found", GENERAL_CHANNEL_NAME)
            }
            ArchiveError::ArchiveCategoryNotFound(name) => {
                write!(f, "No '{}' category found", name)
            }
        }
    }
}

impl std::error::Error for ArchiveError {}

/// Archive a guild's general channel and create a fresh one
///
/// The old channel is renamed to embed the archived period, moved to the
/// top of the archive category, and replaced by a new general channel under
/// its original category (or the named one, when given).
pub async fn archive_general(
    http: &serenity::Http,
    guild_id: GuildId,
    general_cat_name: Option<&str>,
    archive_cat_name: &str,
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> Result<(), Error> {
    let channels = guild_id.channels(http).await?;

    let archive_category = channels
        .values()
        .find(|c| c.kind == ChannelType::Category && c.name == archive_cat_name)
        .ok_or_else(|| ArchiveError::ArchiveCategoryNotFound(archive_cat_name.to_string()))?;

    let general = channels
        .values()
        .find(|c| c.kind == ChannelType::Text && c.name == GENERAL_CHANNEL_NAME)
        .ok_or(ArchiveError::GeneralChannelNotFound)?;

    // Where the replacement channel goes: an explicitly named category, or
    // wherever the old channel lived
    let general_category = match general_cat_name {
        Some(name) => channels
            .values()
            .find(|c| c.kind == ChannelType::Category && c.name == name)
            .map(|c| c.id),
        None => general.parent_id,
    };

    let archived_name = archived_channel_name(period_start, period_end);
    general
        .id
        .edit(
            http,
            EditChannel::new()
                .name(&archived_name)
                .category(Some(archive_category.id))
                .position(0),
        )
        .await?;

    let mut create = CreateChannel::new(GENERAL_CHANNEL_NAME).kind(ChannelType::Text);
    if let Some(category_id) = general_category {
        create = create.category(category_id);
    }
    let new_channel = guild_id.create_channel(http, create).await?;
    new_channel
        .id
        .say(http, crate::constants::POST_ARCHIVE_GREETING)
        .await?;

    info!(
        "Archived general as '{}' in guild {}, created replacement {}",
        archived_name, guild_id, new_channel.id
    );

    Ok(())
}
