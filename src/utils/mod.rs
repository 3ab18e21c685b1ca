/// Utility modules for common functionality
pub mod datetime;
pub mod session;
pub mod timezone;
pub mod validation;
