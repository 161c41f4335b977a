//! Clubs and their rosters

pub mod entities;
pub mod membership;

pub use entities::Club;
pub use membership::Membership;
