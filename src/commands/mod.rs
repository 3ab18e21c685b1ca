// Command modules
mod archive;
mod election;
mod misc;

// Re-export all commands
pub use archive::{archive_general, nextarchivedate};
pub use election::{election, nextresult};
pub use misc::{bruh, datetime, echo, intodatabase, test};
