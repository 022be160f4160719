use std::sync::Arc;
use std::time::Instant;

use crate::adapters::memory_store::InMemoryUserStore;
use crate::config::toml_config::{ServerSettings, TomlConfig};
use crate::core::auth::AuthService;
use crate::domain::ports::UserStore;
use crate::utils::error::Result;

pub struct State {
    pub auth: AuthService,
    pub settings: ServerSettings,
    pub started_at: Instant,
}

impl State {
    /// 使用記憶體儲存層並寫入設定中的示範帳號
    pub async fn new(config: &TomlConfig) -> Result<Arc<Self>> {
        let settings = config.server_settings();
        let state = Self::with_store(Arc::new(InMemoryUserStore::new()), settings);

        let seeded = state.auth.seed_demo_users(&config.demo_users).await?;
        if seeded > 0 {
            tracing::info!("👥 Seeded {} demo user(s)", seeded);
        }

        Ok(state)
    }

    pub fn with_store(store: Arc<dyn UserStore>, settings: ServerSettings) -> Arc<Self> {
        Arc::new(Self {
            auth: AuthService::new(store, settings.bcrypt_cost),
            settings,
            started_at: Instant::now(),
        })
    }

    pub fn endpoints(&self) -> Vec<String> {
        let prefix = &self.settings.api_prefix;
        vec![
            "GET /".to_string(),
            format!("GET {}/health", prefix),
            format!("POST {}/register", prefix),
            format!("POST {}/login", prefix),
        ]
    }
}
