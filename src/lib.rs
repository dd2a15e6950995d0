//! flutter-sweep library crate
//!
//! Remembers Flutter project folders and deletes their build artifacts.
//! This crate provides both a CLI binary and a library API for programmatic use

pub mod access;
pub mod bookmarks;
pub mod cleanup;
pub mod cleanup_events;
pub mod cli;
pub mod config;
pub mod folders;
pub mod logging;
pub mod messages;
pub mod output;
pub mod preferences;
pub mod progress;
pub mod session;
pub mod theme;
pub mod trash_ops;
pub mod utils;
