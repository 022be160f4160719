#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SERVER_PORT: u16 = 3001;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_API_PREFIX: &str = "/api";

/// 用戶端平台提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Web,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Android, Platform::Ios, Platform::Web];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Web => "web",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    /// 未知的平台一律視為 web
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "android" => Platform::Android,
            "ios" => Platform::Ios,
            _ => Platform::Web,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// 行程層級的網路設定，啟動時建立一次後不再變動
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub server_port: u16,
    pub request_timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl NetworkConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// 各平台的候選 URL（有順序）與找不到可用伺服器時的預設 URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTable {
    candidates: HashMap<Platform, Vec<String>>,
    fallbacks: HashMap<Platform, String>,
}

impl CandidateTable {
    /// 開發環境：模擬器、區網 IP 與 localhost
    pub fn development(network: &NetworkConfig) -> Self {
        let port = network.server_port;
        let api = |host: &str| format!("http://{}:{}{}", host, port, DEFAULT_API_PREFIX);

        let mut candidates = HashMap::new();
        candidates.insert(
            Platform::Android,
            vec![api("10.0.2.2"), api("192.168.1.100"), api("192.168.0.100")],
        );
        candidates.insert(Platform::Ios, vec![api("localhost"), api("127.0.0.1")]);
        candidates.insert(Platform::Web, vec![api("localhost")]);

        let mut fallbacks = HashMap::new();
        fallbacks.insert(Platform::Android, api("10.0.2.2"));
        fallbacks.insert(Platform::Ios, api("localhost"));
        fallbacks.insert(Platform::Web, api("localhost"));

        Self {
            candidates,
            fallbacks,
        }
    }

    /// 正式環境：所有平台共用同一個網址
    pub fn production(production_url: &str) -> Self {
        let url = production_url.trim_end_matches('/').to_string();
        let candidates = Platform::ALL
            .iter()
            .map(|p| (*p, vec![url.clone()]))
            .collect();
        let fallbacks = Platform::ALL.iter().map(|p| (*p, url.clone())).collect();

        Self {
            candidates,
            fallbacks,
        }
    }

    /// 以設定檔中的清單取代某個平台的候選 URL
    pub fn with_candidates(mut self, platform: Platform, urls: Vec<String>) -> Self {
        self.candidates.insert(platform, urls);
        self
    }

    pub fn with_fallback(mut self, platform: Platform, url: String) -> Self {
        self.fallbacks.insert(platform, url);
        self
    }

    pub fn candidates(&self, platform: Platform) -> &[String] {
        self.candidates
            .get(&platform)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn fallback(&self, platform: Platform) -> &str {
        self.fallbacks
            .get(&platform)
            .or_else(|| self.fallbacks.get(&Platform::Web))
            .map(String::as_str)
            .unwrap_or("http://localhost:3001/api")
    }
}
