use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::PathSet;

mod config;
mod serve;

#[derive(Parser)]
#[command(author, version, about)]
pub struct App {
    #[command(subcommand)]
    pub commands: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Serve(serve::ServeArgs),
    Config(config::ShowConfigArgs),
}

/// Common configuration path arguments shared by all subcommands.
#[derive(Args)]
pub struct ConfigArgs {
    /// The configuration directory, defaults to `~/.config/ocupacional`
    /// (or `/etc/ocupacional` when running as root).
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// The data directory, defaults to `~/.local/share/ocupacional`
    /// (or `/var/lib/ocupacional` when running as root).
    #[arg(long)]
    pub data_path: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn build_path_set(&self) -> Result<PathSet> {
        PathSet::new(self.config_path.clone(), self.data_path.clone())
    }
}

impl App {
    pub async fn run(&self) -> Result<()> {
        match &self.commands {
            Commands::Serve(args) => args.run().await,
            Commands::Config(args) => args.run(),
        }
    }
}
