//! Utility modules for the static site generator.

pub mod date;
pub mod ignore;
pub mod log;
pub mod slug;
