//! Rendering of finished runs

pub mod console;
pub mod formatter;
