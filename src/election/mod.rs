/// Election management modules
mod pools;
mod rounds;
mod types;

pub use pools::ElectionPools;
pub use rounds::{cancel_election, spawn_election_rounds};
pub use types::{CancelToken, ElectionHandle};
