//! Command-line interface for music-info.
//!
//! This module provides CLI commands for extracting metadata from audio
//! files and inspecting the provenance rule table.

mod commands;

pub use commands::{Cli, Commands, run_command};
