// src/cli/mod.rs — CLI definition (clap derive)

pub mod chat;
pub mod render;
pub mod sessions;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "professor", about = "Multi-session assistant in your terminal", version)]
pub struct Cli {
    /// Model to use (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Directory holding session files (overrides config)
    #[arg(long)]
    pub sessions_dir: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat (default)
    Chat {
        /// Open this session directly instead of showing the menu
        #[arg(long)]
        session: Option<String>,
    },
    /// List saved sessions, oldest first
    Sessions,
}
