use anyhow::{Context, Result};
use clap::Args;

use crate::config::CommonConfig;
use crate::server::config::ServerConfig;

use super::ConfigArgs;

/// Display the effective server configuration in JSON format.
#[derive(Args)]
pub struct ShowConfigArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ShowConfigArgs {
    pub fn run(&self) -> Result<()> {
        let ps = self.config.build_path_set()?;
        let cfg: ServerConfig = ps.load_config("server", ServerConfig::default)?;

        let json = serde_json::to_string_pretty(&cfg).context("encode config json")?;
        println!("{json}");
        Ok(())
    }
}
