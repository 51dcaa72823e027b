//! CLI module for the User Management API
//!
//! Provides subcommands:
//! - `serve`: run the HTTP server
//! - `migrate`: apply PostgreSQL schema migrations and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// User Management API - user accounts with profile images
#[derive(Parser)]
#[command(name = "user-management-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),

    /// Apply database migrations
    Migrate(migrate::MigrateArgs),
}
