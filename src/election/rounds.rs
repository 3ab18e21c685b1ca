use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::{ChannelId, GuildId};
use tokio::time::{Duration, sleep};
use tracing::{error, info};

use crate::models::Data;

use super::{CancelToken, ElectionHandle, ElectionPools};

/// Smallest allowed wait between rounds; guards against a zero or negative
/// configured interval
const MIN_ROUND_WAIT: Duration = Duration::from_secs(60);

/// Wait between rounds for a configured interval, clamped to the minimum
pub(crate) fn round_wait(interval: ChronoDuration) -> Duration {
    interval
        .to_std()
        .map_or(MIN_ROUND_WAIT, |wait| wait.max(MIN_ROUND_WAIT))
}

/// Spawn the round loop for a freshly registered election
///
/// Each round sleeps for the interval, re-checks cancellation, draws one
/// user and one role, and announces the pairing in the channel the election
/// was started from. The loop ends when the user pool is exhausted or the
/// election was cancelled.
///
/// `cancel` must be the token of the handle registered for this election.
/// The task checks its own token rather than whatever is in the registry,
/// so a cancel followed by a fresh `$election` can't revive this loop, and
/// every registry mutation is identity-guarded against the token so a loop
/// that lost its registration never touches a successor election's entry.
pub fn spawn_election_rounds(
    http: Arc<serenity::Http>,
    data: Data,
    guild_id: GuildId,
    channel_id: ChannelId,
    cancel: CancelToken,
    interval: ChronoDuration,
    mut pools: ElectionPools,
) {
    tokio::spawn(async move {
        let wait = round_wait(interval);

        loop {
            sleep(wait).await;

            // Cancellation is observed here, at the suspension boundary
            if cancel.is_cancelled() {
                info!("Election in guild {} was cancelled, stopping rounds", guild_id);
                return;
            }

            // Scope the rng so the task stays Send across awaits
            let drawn = {
                let mut rng = rand::rng();
                pools.draw_round(&mut rng)
            };

            let Some((user, role)) = drawn else {
                break;
            };

            let announcement = format!(
                "Role change announcement @everyone: <@{}>'s new role will be {}",
                user, role
            );
            if let Err(e) = channel_id.say(&http, announcement).await {
                error!("Failed to announce election result in guild {}: {}", guild_id, e);
            }

            if let Some(mut handle) = data.elections.get_mut(&guild_id)
                && handle.cancel.same_as(&cancel)
            {
                handle.next_time = Utc::now() + handle.interval;
            }

            if pools.is_finished() {
                break;
            }
        }

        // Natural completion; only deregister our own election
        data.elections
            .remove_if(&guild_id, |_, handle| handle.cancel.same_as(&cancel));
        if let Err(e) = channel_id.say(&http, "Roles have all been reassigned").await {
            error!("Failed to announce election completion in guild {}: {}", guild_id, e);
        }
        info!("Election completed in guild {}", guild_id);
    });
}

/// Cancel the active election for a guild, if any
///
/// Removes the registry entry and flags the token; the sleeping round loop
/// exits at its next wake without announcing completion.
pub fn cancel_election(elections: &DashMap<GuildId, ElectionHandle>, guild_id: GuildId) -> bool {
    match elections.remove(&guild_id) {
        Some((_, handle)) => {
            handle.cancel.cancel();
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(elections: &DashMap<GuildId, ElectionHandle>, guild_id: GuildId) -> CancelToken {
        let handle = ElectionHandle::new(Utc::now(), ChronoDuration::minutes(60));
        let token = handle.cancel.clone();
        elections.insert(guild_id, handle);
        token
    }

    #[test]
    fn test_cancel_election_flags_token_and_deregisters() {
        let elections = DashMap::new();
        let guild_id = GuildId::new(1);
        let token = register(&elections, guild_id);

        assert!(cancel_election(&elections, guild_id));
        assert!(token.is_cancelled());
        assert!(!elections.contains_key(&guild_id));

        // nothing left to cancel
        assert!(!cancel_election(&elections, guild_id));
    }

    /// Cancelling and immediately starting a fresh election must not revive
    /// the old round loop: the old task's own token stays cancelled, and
    /// identity-guarded cleanup leaves the new registration alone.
    #[test]
    fn test_cancel_then_restart_keeps_old_loop_dead() {
        let elections = DashMap::new();
        let guild_id = GuildId::new(1);

        let old_token = register(&elections, guild_id);
        assert!(cancel_election(&elections, guild_id));

        // Owner restarts before the old loop's sleep expires
        let new_token = register(&elections, guild_id);

        // The old task checks the token it was spawned with
        assert!(old_token.is_cancelled());
        assert!(!new_token.is_cancelled());

        // A stale completion only removes an entry holding its own token
        elections.remove_if(&guild_id, |_, handle| handle.cancel.same_as(&old_token));
        assert!(
            elections.contains_key(&guild_id),
            "stale cleanup must not consume the restarted election"
        );

        // The live loop's cleanup still works
        elections.remove_if(&guild_id, |_, handle| handle.cancel.same_as(&new_token));
        assert!(!elections.contains_key(&guild_id));
    }

    #[test]
    fn test_round_wait_clamps_degenerate_intervals() {
        assert_eq!(round_wait(ChronoDuration::minutes(0)), MIN_ROUND_WAIT);
        assert_eq!(round_wait(ChronoDuration::minutes(-5)), MIN_ROUND_WAIT);
        assert_eq!(round_wait(ChronoDuration::seconds(10)), MIN_ROUND_WAIT);
        assert_eq!(
            round_wait(ChronoDuration::minutes(30)),
            Duration::from_secs(1800)
        );
    }
}
