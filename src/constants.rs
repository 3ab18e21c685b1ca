/// Prefix for text commands
pub const COMMAND_PREFIX: &str = "$";

/// Name of the text channel that gets archived and recreated
pub const GENERAL_CHANNEL_NAME: &str = "general";

/// Name of the category archived channels are moved into
pub const ARCHIVE_CATEGORY_NAME: &str = "Archive";

/// How often the general channel is archived, in weeks
pub const ARCHIVE_FREQUENCY_WEEKS: i64 = 2;

/// Default timezone for guilds that haven't configured one
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Default minutes between election result announcements
pub const DEFAULT_ELECTION_INTERVAL_MINS: i64 = 60;

/// Roles handed out by the election
pub const DEFAULT_ROLE_SHUFFLE: &[&str] = &[
    "CEO of the Republic",
    "Indian of the Republic",
    "The Softest of the Softest Carries",
    "Chinese of the Republic",
    "Economist of the Republic",
    "Pope of the Republic",
];

/// Reply sent when a message doesn't match any known command
pub const UNKNOWN_COMMAND_REPLY: &str = "That ain't a command my brother in Christ";

/// Message posted in the freshly created general channel after an archive
pub const POST_ARCHIVE_GREETING: &str = "good morning @everyone";

/// Log directive for the application
pub const LOG_DIRECTIVE: &str = "walarus=info";
