use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sortboard")]
#[command(about = "Sync session processing status into a Notion database", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan the session tree and create or update one database entry per session
    Sync,
    /// Scan the session tree and print each session's status without writing
    Scan,
    /// Display the database's property names and types
    Schema,
    /// Print configuration values
    PrintConfig,
}
