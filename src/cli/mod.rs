//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for hospital-sync using clap.

pub mod commands;

use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};

/// hospital-sync - live view and editing of hospital records grouped by year
#[derive(Parser, Debug)]
#[command(name = "hospital-sync")]
#[command(version, about, long_about = None)]
#[command(author = "Hospital Sync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, env = "HOSPITAL_SYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, env = "HOSPITAL_SYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print hospitals as they change, until interrupted
    Watch(commands::watch::WatchArgs),

    /// Print the current hospitals once
    List(commands::list::ListArgs),

    /// Add a hospital to a year
    Add(commands::add::AddArgs),

    /// Replace all fields of a hospital
    Update(commands::update::UpdateArgs),

    /// Delete a hospital
    Delete(commands::delete::DeleteArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Whether the command talks to the store and should log to files
    pub fn uses_store(&self) -> bool {
        !matches!(self, Commands::ValidateConfig(_) | Commands::Init(_))
    }
}
