pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{CliConfig, Command};

pub use crate::adapters::memory_store::InMemoryUserStore;
pub use crate::config::toml_config::TomlConfig;
pub use crate::config::{CandidateTable, Environment, NetworkConfig, Platform};
pub use crate::core::{api_client::KehilClient, auth::AuthService, fetch::FetchClient, prober::Prober};
pub use crate::utils::error::{KehilError, Result};
