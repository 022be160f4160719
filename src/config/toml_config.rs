use crate::config::{
    CandidateTable, Environment, NetworkConfig, Platform, DEFAULT_API_PREFIX,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SERVER_PORT,
};
use crate::utils::error::{KehilError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_BCRYPT_COST: u32 = 10;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub candidates: CandidatesSection,
    #[serde(default)]
    pub demo_users: Vec<DemoUserConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkSection {
    pub server_port: Option<u16>,
    pub request_timeout_ms: Option<u64>,
    pub environment: Option<Environment>,
    pub production_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind_address: Option<String>,
    pub api_prefix: Option<String>,
    pub bcrypt_cost: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidatesSection {
    pub android: Option<Vec<String>>,
    pub ios: Option<Vec<String>>,
    pub web: Option<Vec<String>>,
    pub fallback_android: Option<String>,
    pub fallback_ios: Option<String>,
    pub fallback_web: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoUserConfig {
    pub name: String,
    #[serde(default)]
    pub surname: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub is_company: bool,
}

/// 後端服務啟動所需的設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind_address: String,
    pub port: u16,
    pub api_prefix: String,
    pub bcrypt_cost: u32,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(KehilError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| KehilError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${KEHILAPP_HOST})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| KehilError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 命令列參數覆寫檔案中的設定
    pub fn apply_overrides(&mut self, port: Option<u16>, timeout_ms: Option<u64>) {
        if let Some(port) = port {
            self.network.server_port = Some(port);
        }
        if let Some(timeout_ms) = timeout_ms {
            self.network.request_timeout_ms = Some(timeout_ms);
        }
    }

    pub fn environment(&self) -> Environment {
        self.network.environment.unwrap_or_default()
    }

    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            server_port: self.network.server_port.unwrap_or(DEFAULT_SERVER_PORT),
            request_timeout_ms: self
                .network
                .request_timeout_ms
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// 依環境與覆寫清單建立候選 URL 表
    pub fn candidate_table(&self) -> Result<CandidateTable> {
        let mut table = match self.environment() {
            Environment::Development => CandidateTable::development(&self.network_config()),
            Environment::Production => {
                let url = validation::validate_required_field(
                    "network.production_url",
                    &self.network.production_url,
                )?;
                CandidateTable::production(url)
            }
        };

        let c = &self.candidates;
        for (platform, urls, fallback) in [
            (Platform::Android, &c.android, &c.fallback_android),
            (Platform::Ios, &c.ios, &c.fallback_ios),
            (Platform::Web, &c.web, &c.fallback_web),
        ] {
            if let Some(urls) = urls {
                table = table.with_candidates(platform, urls.clone());
            }
            if let Some(fallback) = fallback {
                table = table.with_fallback(platform, fallback.clone());
            }
        }

        Ok(table)
    }

    pub fn server_settings(&self) -> ServerSettings {
        let prefix = self
            .server
            .api_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());

        ServerSettings {
            bind_address: self
                .server
                .bind_address
                .clone()
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: self.network_config().server_port,
            api_prefix: normalize_prefix(&prefix),
            bcrypt_cost: self.server.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        let network = self.network_config();
        validation::validate_positive_number(
            "network.request_timeout_ms",
            network.request_timeout_ms,
            1,
        )?;
        validation::validate_positive_number(
            "network.server_port",
            u64::from(network.server_port),
            1,
        )?;

        if let Some(url) = &self.network.production_url {
            validation::validate_url("network.production_url", url)?;
        }
        if self.environment() == Environment::Production {
            validation::validate_required_field(
                "network.production_url",
                &self.network.production_url,
            )?;
        }

        for (field, urls) in [
            ("candidates.android", &self.candidates.android),
            ("candidates.ios", &self.candidates.ios),
            ("candidates.web", &self.candidates.web),
        ] {
            if let Some(urls) = urls {
                validation::validate_urls(field, urls)?;
            }
        }
        for (field, url) in [
            ("candidates.fallback_android", &self.candidates.fallback_android),
            ("candidates.fallback_ios", &self.candidates.fallback_ios),
            ("candidates.fallback_web", &self.candidates.fallback_web),
        ] {
            if let Some(url) = url {
                validation::validate_url(field, url)?;
            }
        }

        if let Some(cost) = self.server.bcrypt_cost {
            validation::validate_range(
                "server.bcrypt_cost",
                cost,
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST,
            )?;
        }
        if let Some(address) = &self.server.bind_address {
            validation::validate_non_empty_string("server.bind_address", address)?;
        }

        for (index, user) in self.demo_users.iter().enumerate() {
            validation::validate_non_empty_string(&format!("demo_users[{}].email", index), &user.email)?;
            validation::validate_non_empty_string(
                &format!("demo_users[{}].password", index),
                &user.password,
            )?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// 確保前綴以 `/` 開頭且不以 `/` 結尾；空字串代表掛在根目錄
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
