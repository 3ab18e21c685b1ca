use poise::serenity_prelude::GuildId;

use crate::models::Context;

/// Validation error types
#[derive(Debug)]
pub enum ValidationError {
    NotInGuild,
    NotAGuildChannel,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NotInGuild => write!(f, "This command must be used in a server"),
            ValidationError::NotAGuildChannel => write!(f, "Expected a guild channel"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Extract guild ID from context, returning error if not in a guild
pub fn require_guild(guild_id: Option<GuildId>) -> Result<GuildId, ValidationError> {
    guild_id.ok_or(ValidationError::NotInGuild)
}

/// Whether the command author owns the guild it was invoked in
pub fn author_is_guild_owner(ctx: &Context<'_>) -> bool {
    ctx.guild()
        .map(|guild| guild.owner_id == ctx.author().id)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_guild() {
        assert!(require_guild(None).is_err());
        assert!(require_guild(Some(GuildId::new(123))).is_ok());
    }
}
