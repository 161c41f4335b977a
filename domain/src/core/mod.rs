//! Core value objects and errors shared by every domain module

pub mod error;
pub mod ids;

pub use error::DomainError;
pub use ids::{ClubId, ItemId, MemberId};
