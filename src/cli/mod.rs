//! CLI module for the DMSA service

pub mod serve;

use clap::{Parser, Subcommand};

/// Data model DDL and ERD web service
#[derive(Parser)]
#[command(name = "dmsa-service")]
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
