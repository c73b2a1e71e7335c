//! CLI tool for inspecting and administering the chord ring.
//!
//! Provides commands for:
//! - Looking up ring positions, owners and replicas of keys
//! - Listing nodes with their ownership tallies
//! - Activating/deactivating nodes
//! - Adding users, storing messages and reading the operation log

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
