use std::sync::Arc;

use dashmap::DashMap;
use poise::serenity_prelude::{GuildId, UserId};

use crate::constants::{DEFAULT_ELECTION_INTERVAL_MINS, DEFAULT_ROLE_SHUFFLE, DEFAULT_TIMEZONE};
use crate::database::Database;
use crate::election::ElectionHandle;

/// Per-guild runtime configuration, built on ready and guild join
#[derive(Clone, Debug)]
pub struct ServerState {
    /// IANA timezone name used when rendering times for this guild
    pub timezone: String,
    /// Minutes between election result announcements
    pub election_interval_mins: i64,
    /// Roles put up for grabs by the election
    pub role_shuffle: Vec<String>,
    /// Members participating in the election
    pub user_shuffle: Vec<UserId>,
}

impl ServerState {
    pub fn new(user_shuffle: Vec<UserId>) -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            election_interval_mins: DEFAULT_ELECTION_INTERVAL_MINS,
            role_shuffle: DEFAULT_ROLE_SHUFFLE.iter().map(|r| r.to_string()).collect(),
            user_shuffle,
        }
    }
}

/// Bot state shared across all handlers
///
/// Clones share the underlying registries, so long-lived tasks can hold
/// their own copy.
#[derive(Clone)]
pub struct Data {
    /// Database connection
    pub db: Database,
    /// Maps guild IDs to their runtime state
    pub servers: Arc<DashMap<GuildId, ServerState>>,
    /// Maps guild IDs to their active election, if any
    pub elections: Arc<DashMap<GuildId, ElectionHandle>>,
}

impl Data {
    /// Create a new Data instance with the given database connection
    pub fn new(db: Database) -> Self {
        Self {
            db,
            servers: Arc::new(DashMap::new()),
            elections: Arc::new(DashMap::new()),
        }
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
