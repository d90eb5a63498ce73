//! Helpers shared by the build and deploy commands.

pub mod command;
pub mod date;
pub mod git;
pub mod persist;
