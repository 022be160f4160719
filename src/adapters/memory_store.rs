use crate::core::auth::normalize_email;
use crate::domain::model::{NewUser, User};
use crate::domain::ports::UserStore;
use crate::utils::error::{KehilError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// 以 email 為鍵的記憶體儲存層，重新啟動後資料即消失
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&normalize_email(email)).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let email = normalize_email(&user.email);
        let mut users = self.users.write().await;

        // 在同一把寫鎖內檢查，避免同時註冊造成重複
        if users.contains_key(&email) {
            return Err(KehilError::DuplicateEmail { email });
        }

        let stored = User {
            id: users.len() as u64 + 1,
            name: user.name,
            surname: user.surname,
            email: email.clone(),
            password_hash: user.password_hash,
            phone: user.phone,
            is_company: user.is_company,
            created_at: Utc::now(),
        };
        users.insert(email, stored.clone());
        Ok(stored)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.users.read().await.len())
    }
}
