use crate::config::toml_config::TomlConfig;
use crate::config::{Environment, Platform};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "kehilapp")]
#[command(about = "KehilApp backend and endpoint discovery tools")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, env = "KEHILAPP_PORT")]
    pub port: Option<u16>,

    #[arg(long, global = true, help = "Per-request timeout in milliseconds")]
    pub timeout_ms: Option<u64>,

    #[arg(long, global = true, value_enum)]
    pub environment: Option<Environment>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the registration/login backend
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
    /// Find the first reachable backend URL for a platform
    Discover {
        /// android, ios or web; anything else is treated as web
        #[arg(long, value_parser = clap::value_parser!(Platform), default_value = "web")]
        platform: Platform,
    },
    /// Probe every candidate URL and report which ones respond
    Survey {
        #[arg(long, value_parser = clap::value_parser!(Platform))]
        platform: Option<Platform>,
    },
    /// Fetch the health status of a backend base URL
    Health { url: String },
}

impl CliConfig {
    /// 載入設定檔（若有）並套用命令列覆寫
    pub fn load_config(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        config.apply_overrides(self.port, self.timeout_ms);
        if let Some(environment) = self.environment {
            config.network.environment = Some(environment);
        }
        if let Command::Serve {
            bind: Some(bind), ..
        } = &self.command
        {
            config.server.bind_address = Some(bind.clone());
        }

        Ok(config)
    }
}
