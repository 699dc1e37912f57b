//! CLI module for Scout.

pub mod commands;
mod output;

pub use output::{truncate, Output};

use clap::{Parser, Subcommand};

/// Scout - research assistant API
///
/// Answers research questions with an LLM that can search the web, look up
/// Wikipedia and save its findings, returning a structured JSON answer.
#[derive(Parser, Debug)]
#[command(name = "scout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-D for debug, -DD for trace)
    #[arg(short = 'D', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Research a query from the terminal and print the structured answer
    Ask {
        /// The research query
        query: String,
    },

    /// Estimate token usage and API cost for the files in a directory
    Tokens {
        /// Directory to analyze
        #[arg(short, long, default_value = ".")]
        dir: String,

        /// File types to analyze (comma separated)
        #[arg(short, long, default_value = crate::usage::DEFAULT_EXTENSIONS)]
        types: String,

        /// Show per-file token counts
        #[arg(short, long)]
        verbose: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
