use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};

/// Cooperative cancellation flag checked at each suspension boundary
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Whether two tokens are clones of the same flag
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Registry entry for a running election
///
/// Present in the elections map exactly while an election is in progress.
/// The working role/user lists are owned by the round task, not the handle.
#[derive(Clone, Debug)]
pub struct ElectionHandle {
    pub started_at: DateTime<Utc>,
    pub interval: Duration,
    /// When the next result will be announced; advanced each round
    pub next_time: DateTime<Utc>,
    pub cancel: CancelToken,
}

impl ElectionHandle {
    pub fn new(now: DateTime<Utc>, interval: Duration) -> Self {
        Self {
            started_at: now,
            interval,
            next_time: now + interval,
            cancel: CancelToken::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());

        let shared = token.clone();
        shared.cancel();
        assert!(token.is_cancelled());

        assert!(token.same_as(&shared));
        assert!(!token.same_as(&CancelToken::new()));
    }

    #[test]
    fn test_handle_next_time() {
        let now = Utc::now();
        let handle = ElectionHandle::new(now, Duration::minutes(30));
        assert_eq!(handle.next_time, now + Duration::minutes(30));
    }
}
