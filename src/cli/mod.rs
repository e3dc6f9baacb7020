//! CLI module for the team authorization service

pub mod serve;

use clap::{Parser, Subcommand};

/// Team-scoped authorization service
#[derive(Parser)]
#[command(name = "teamgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,
}
