use chrono_tz::Tz;

/// Error types for timezone operations
#[derive(Debug)]
pub enum TimezoneError {
    InvalidTimezone(String),
}

impl std::fmt::Display for TimezoneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimezoneError::InvalidTimezone(tz) => write!(f, "Invalid timezone: {}", tz),
        }
    }
}

impl std::error::Error for TimezoneError {}

/// Parse a timezone string
pub fn parse_timezone(tz_str: &str) -> Result<Tz, TimezoneError> {
    tz_str
        .parse()
        .map_err(|_| TimezoneError::InvalidTimezone(tz_str.to_string()))
}

/// Parse a guild's configured timezone, falling back to UTC if invalid
pub fn guild_timezone(tz_str: &str) -> Tz {
    parse_timezone(tz_str).unwrap_or(chrono_tz::UTC)
}
