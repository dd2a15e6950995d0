//! Command feature handlers.
//!
//! Each module owns one command feature.

pub mod access_command;
pub mod add_command;
pub mod clean_command;
pub mod config_command;
pub mod list_command;
pub mod remove_command;
pub mod targets_command;
