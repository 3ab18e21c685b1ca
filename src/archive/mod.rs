/// Channel archiving modules
mod scheduler;
mod sweep;

pub use scheduler::start_archive_scheduler;
pub use sweep::archive_general;
