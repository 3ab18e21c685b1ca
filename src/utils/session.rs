/// Pure decision logic for voice session tracking (Discord-agnostic)
///
/// Voice handlers turn channel snapshots into a list of stat updates here,
/// then apply them through the database. Time only accrues for a user while
/// at least two non-bot members share their channel.
use chrono::{DateTime, Utc};
use poise::serenity_prelude::UserId;

/// A member currently present in a voice channel
#[derive(Clone, Copy, Debug)]
pub struct Presence {
    pub user_id: UserId,
    pub is_bot: bool,
}

/// A single change to a user's persisted voice stats
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatUpdate {
    /// User joined a channel at the given instant
    Connected { user_id: UserId, at: DateTime<Utc> },
    /// Start or stop the user's shared session timer
    TimerRunning { user_id: UserId, running: bool },
    /// Add elapsed seconds to the user's cumulative voice time
    CreditTime { user_id: UserId, seconds: i64 },
    /// User left; clears the connected and timer flags
    Disconnected { user_id: UserId },
}

/// Count the non-bot members in a channel snapshot
pub fn non_bot_count(members: &[Presence]) -> usize {
    members.iter().filter(|m| !m.is_bot).count()
}

/// Seconds elapsed since a connection timestamp, clamped at zero
pub fn session_seconds(connected_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - connected_at).num_seconds().max(0)
}

/// Updates for a user joining a channel
///
/// `members` is the destination channel's membership including the joiner.
/// A second human arriving activates the timer for everyone already there,
/// so the timer flag is written for every member, not just the joiner.
pub fn on_join(joiner: UserId, members: &[Presence], at: DateTime<Utc>) -> Vec<StatUpdate> {
    let running = non_bot_count(members) > 1;

    let mut updates = vec![StatUpdate::Connected { user_id: joiner, at }];
    for member in members {
        updates.push(StatUpdate::TimerRunning {
            user_id: member.user_id,
            running,
        });
    }
    updates
}

/// Updates for a user leaving a channel
///
/// `straggler` is the sole remaining member (with their current timer flag)
/// when the channel is down to exactly one person after the leave; their
/// timer is force-stopped since no further time should accrue alone.
pub fn on_leave(
    leaver: UserId,
    leaver_timer_running: bool,
    session_secs: i64,
    straggler: Option<(UserId, bool)>,
) -> Vec<StatUpdate> {
    let mut updates = Vec::new();

    if let Some((user_id, timer_running)) = straggler
        && timer_running
    {
        updates.push(StatUpdate::CreditTime {
            user_id,
            seconds: session_secs,
        });
        updates.push(StatUpdate::TimerRunning {
            user_id,
            running: false,
        });
    }

    if leaver_timer_running {
        updates.push(StatUpdate::CreditTime {
            user_id: leaver,
            seconds: session_secs,
        });
    }

    updates.push(StatUpdate::Disconnected { user_id: leaver });
    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use std::collections::HashMap;

    /// In-memory mirror of a user's voice stats row
    #[derive(Clone, Copy, Debug, Default)]
    struct Row {
        connected_to_vc: bool,
        vc_timer: bool,
        time_in_vc: i64,
    }

    fn apply(rows: &mut HashMap<UserId, Row>, updates: &[StatUpdate]) {
        for update in updates {
            match *update {
                StatUpdate::Connected { user_id, .. } => {
                    rows.entry(user_id).or_default().connected_to_vc = true;
                }
                StatUpdate::TimerRunning { user_id, running } => {
                    rows.entry(user_id).or_default().vc_timer = running;
                }
                StatUpdate::CreditTime { user_id, seconds } => {
                    rows.entry(user_id).or_default().time_in_vc += seconds;
                }
                StatUpdate::Disconnected { user_id } => {
                    let row = rows.entry(user_id).or_default();
                    row.connected_to_vc = false;
                    row.vc_timer = false;
                }
            }
        }
    }

    fn check_invariant(rows: &HashMap<UserId, Row>) {
        for (user_id, row) in rows {
            assert!(
                !row.vc_timer || row.connected_to_vc,
                "vc_timer without connected_to_vc for {user_id}"
            );
        }
    }

    fn human(id: u64) -> Presence {
        Presence {
            user_id: UserId::new(id),
            is_bot: false,
        }
    }

    fn bot(id: u64) -> Presence {
        Presence {
            user_id: UserId::new(id),
            is_bot: true,
        }
    }

    #[test]
    fn test_non_bot_count() {
        assert_eq!(non_bot_count(&[]), 0);
        assert_eq!(non_bot_count(&[human(1), bot(2)]), 1);
        assert_eq!(non_bot_count(&[human(1), human(2), bot(3)]), 2);
    }

    #[test]
    fn test_session_seconds_clamped() {
        let now = Utc::now();
        assert_eq!(session_seconds(now - TimeDelta::seconds(30), now), 30);
        assert_eq!(session_seconds(now + TimeDelta::seconds(5), now), 0);
    }

    #[test]
    fn test_first_join_does_not_start_timer() {
        let a = human(1);
        let updates = on_join(a.user_id, &[a], Utc::now());
        assert!(updates.contains(&StatUpdate::TimerRunning {
            user_id: a.user_id,
            running: false,
        }));
    }

    #[test]
    fn test_second_join_starts_timer_for_everyone() {
        let (a, b) = (human(1), human(2));
        let updates = on_join(b.user_id, &[a, b], Utc::now());
        for member in [a, b] {
            assert!(updates.contains(&StatUpdate::TimerRunning {
                user_id: member.user_id,
                running: true,
            }));
        }
    }

    #[test]
    fn test_bot_join_does_not_start_timer() {
        let (a, b) = (human(1), bot(2));
        let updates = on_join(b.user_id, &[a, b], Utc::now());
        assert!(updates.contains(&StatUpdate::TimerRunning {
            user_id: a.user_id,
            running: false,
        }));
    }

    /// A and B join in order; A's timer starts only once B arrives. A leaves
    /// after 30 seconds: A is credited 30s, and B (now alone) is credited and
    /// force-stopped.
    #[test]
    fn test_join_leave_scenario() {
        let (a, b) = (human(1), human(2));
        let mut rows = HashMap::new();
        let start = Utc::now();

        apply(&mut rows, &on_join(a.user_id, &[a], start));
        check_invariant(&rows);
        assert!(!rows[&a.user_id].vc_timer);

        apply(&mut rows, &on_join(b.user_id, &[a, b], start));
        check_invariant(&rows);
        assert!(rows[&a.user_id].vc_timer);
        assert!(rows[&b.user_id].vc_timer);

        // A leaves after 30 seconds; B is the straggler
        let secs = session_seconds(start, start + TimeDelta::seconds(30));
        let (a_timer, b_timer) = (rows[&a.user_id].vc_timer, rows[&b.user_id].vc_timer);
        let updates = on_leave(a.user_id, a_timer, secs, Some((b.user_id, b_timer)));
        apply(&mut rows, &updates);
        check_invariant(&rows);

        assert_eq!(rows[&a.user_id].time_in_vc, 30);
        assert_eq!(rows[&b.user_id].time_in_vc, 30);
        assert!(!rows[&a.user_id].connected_to_vc);
        assert!(!rows[&b.user_id].vc_timer);
        assert!(rows[&b.user_id].connected_to_vc);
    }

    #[test]
    fn test_leave_without_timer_credits_nothing() {
        let a = human(1);
        let mut rows = HashMap::new();
        apply(&mut rows, &on_join(a.user_id, &[a], Utc::now()));

        // A was alone the whole time, so nothing accrues
        let updates = on_leave(a.user_id, rows[&a.user_id].vc_timer, 120, None);
        apply(&mut rows, &updates);
        check_invariant(&rows);
        assert_eq!(rows[&a.user_id].time_in_vc, 0);
        assert!(!rows[&a.user_id].connected_to_vc);
    }

    #[test]
    fn test_straggler_without_timer_not_credited() {
        let (a, b) = (human(1), human(2));
        // B's timer never started (e.g. joined a channel that emptied out)
        let updates = on_leave(a.user_id, true, 45, Some((b.user_id, false)));
        assert!(!updates.iter().any(|u| matches!(
            u,
            StatUpdate::CreditTime { user_id, .. } if *user_id == b.user_id
        )));
        assert!(updates.contains(&StatUpdate::CreditTime {
            user_id: a.user_id,
            seconds: 45,
        }));
    }

    /// The leaver's disconnect closes every leave batch, after any straggler
    /// updates, so the leaver's flags get cleared even when an earlier
    /// update in the batch fails to apply.
    #[test]
    fn test_leave_always_ends_with_disconnect() {
        let (a, b) = (human(1), human(2));

        for straggler in [None, Some((b.user_id, true)), Some((b.user_id, false))] {
            let updates = on_leave(a.user_id, true, 30, straggler);
            assert_eq!(
                updates.last(),
                Some(&StatUpdate::Disconnected { user_id: a.user_id })
            );
        }
    }

    #[test]
    fn test_time_in_vc_monotonic() {
        let (a, b) = (human(1), human(2));
        let mut rows = HashMap::new();
        let start = Utc::now();
        let mut last_total = 0;

        for round in 0..5 {
            apply(&mut rows, &on_join(a.user_id, &[a], start));
            apply(&mut rows, &on_join(b.user_id, &[a, b], start));
            let secs = 10 * round;
            let (a_timer, b_timer) = (rows[&a.user_id].vc_timer, rows[&b.user_id].vc_timer);
            let a_leaves = on_leave(a.user_id, a_timer, secs, Some((b.user_id, b_timer)));
            apply(&mut rows, &a_leaves);
            let b_timer = rows[&b.user_id].vc_timer;
            let b_leaves = on_leave(b.user_id, b_timer, secs, None);
            apply(&mut rows, &b_leaves);
            check_invariant(&rows);

            let total: i64 = rows.values().map(|r| r.time_in_vc).sum();
            assert!(total >= last_total, "time_in_vc decreased");
            last_total = total;
        }
    }
}
