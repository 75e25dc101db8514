use anyhow::{Context, Result};
use clap::Args;
use log::info;

use crate::config::CommonConfig;
use crate::logs;
use crate::server::config::ServerConfig;
use crate::server::factory::ServerFactory;

use super::ConfigArgs;

/// Start the back-office server
#[derive(Args)]
pub struct ServeArgs {
    /// The log level, one of "error", "info", "debug"
    #[arg(short, long, default_value = "info")]
    pub level: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl ServeArgs {
    pub async fn run(&self) -> Result<()> {
        logs::init(&self.level)?;

        let ps = self.config.build_path_set()?;
        let cfg: ServerConfig = ps.load_config("server", ServerConfig::default)?;

        let factory = ServerFactory::new(cfg).context("init server factory")?;
        let srv = factory.build_server().context("build server")?;

        srv.run().await?;

        info!("Server exited by user");
        Ok(())
    }
}
