//! Reference host for the region rules: in-memory worlds, a plugin manager,
//! and an event replayer.

pub mod config;
pub mod error;
pub mod host;
pub mod plugin_manager;
pub mod replay;
