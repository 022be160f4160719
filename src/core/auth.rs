use crate::config::toml_config::DemoUserConfig;
use crate::domain::model::{LoginRequest, NewUser, RegisterRequest, User};
use crate::domain::ports::UserStore;
use crate::utils::error::{KehilError, Result};
use crate::utils::validation::validate_non_empty_string;
use std::sync::Arc;

/// 註冊與登入流程；密碼一律以 bcrypt 雜湊，不做明文比對
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    bcrypt_cost: u32,
}

/// email 比對前先去除空白並轉小寫
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        validate_registration(&request)?;

        let email = normalize_email(&request.email);
        if self.store.find_by_email(&email).await?.is_some() {
            tracing::info!("⚠️ Registration rejected, email already registered: {}", email);
            return Err(KehilError::DuplicateEmail { email });
        }

        let password_hash = self.hash_password(request.password).await?;
        let user = self
            .store
            .insert(NewUser {
                name: request.name.trim().to_string(),
                surname: request.surname.trim().to_string(),
                email,
                password_hash,
                phone: request.phone.trim().to_string(),
                is_company: request.is_company,
            })
            .await?;

        tracing::info!("✅ Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<User> {
        let email = normalize_email(&request.email);
        if email.is_empty() || request.password.is_empty() {
            return Err(KehilError::InvalidCredentials);
        }

        let Some(user) = self.store.find_by_email(&email).await? else {
            tracing::debug!("Login failed, unknown email: {}", email);
            return Err(KehilError::InvalidCredentials);
        };

        if !self
            .verify_password(request.password, user.password_hash.clone())
            .await?
        {
            tracing::debug!("Login failed, wrong password for {}", email);
            return Err(KehilError::InvalidCredentials);
        }

        tracing::info!("✅ User {} logged in", user.id);
        Ok(user)
    }

    /// 將設定中的示範帳號寫入儲存層；已存在的帳號略過
    pub async fn seed_demo_users(&self, users: &[DemoUserConfig]) -> Result<usize> {
        let mut seeded = 0;
        for demo in users {
            let request = RegisterRequest {
                name: demo.name.clone(),
                surname: demo.surname.clone(),
                email: demo.email.clone(),
                password: demo.password.clone(),
                phone: demo.phone.clone(),
                is_company: demo.is_company,
            };
            match self.register(request).await {
                Ok(_) => seeded += 1,
                Err(KehilError::DuplicateEmail { email }) => {
                    tracing::debug!("Demo user {} already present", email);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(seeded)
    }

    // bcrypt 是 CPU 密集運算，移到 blocking 執行緒
    async fn hash_password(&self, password: String) -> Result<String> {
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| KehilError::IoError(std::io::Error::other(e)))?
            .map_err(KehilError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| KehilError::IoError(std::io::Error::other(e)))?
            .map_err(KehilError::from)
    }
}

fn validate_registration(request: &RegisterRequest) -> Result<()> {
    let fields = [
        ("name", request.name.as_str()),
        ("email", request.email.as_str()),
        ("password", request.password.as_str()),
    ];
    for (field, value) in fields {
        validate_non_empty_string(field, value).map_err(|_| KehilError::ValidationError {
            message: format!("Field '{}' is required", field),
        })?;
    }

    if !request.email.contains('@') {
        return Err(KehilError::ValidationError {
            message: "Email address is not valid".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_store::InMemoryUserStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(InMemoryUserStore::new()), 4)
    }

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Miriam".to_string(),
            surname: "Cohen".to_string(),
            email: email.to_string(),
            password: "shalom123".to_string(),
            phone: "555-0199".to_string(),
            is_company: false,
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let auth = service();
        let user = auth.register(registration("miriam@kehilapp.com")).await.unwrap();

        assert_ne!(user.password_hash, "shalom123");
        assert!(user.password_hash.starts_with("$2"));
        assert!(bcrypt::verify("shalom123", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_case_insensitive() {
        let auth = service();
        auth.register(registration("miriam@kehilapp.com")).await.unwrap();

        let result = auth.register(registration("  Miriam@KehilApp.com ")).await;

        assert!(matches!(result, Err(KehilError::DuplicateEmail { .. })));
        assert_eq!(auth.store().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let auth = service();

        let mut missing_name = registration("a@kehilapp.com");
        missing_name.name = "  ".to_string();
        assert!(matches!(
            auth.register(missing_name).await,
            Err(KehilError::ValidationError { .. })
        ));

        let bad_email = registration("not-an-email");
        assert!(matches!(
            auth.register(bad_email).await,
            Err(KehilError::ValidationError { .. })
        ));

        assert_eq!(auth.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_login_checks_password() {
        let auth = service();
        auth.register(registration("miriam@kehilapp.com")).await.unwrap();

        let ok = auth
            .login(LoginRequest {
                email: "MIRIAM@kehilapp.com".to_string(),
                password: "shalom123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(ok.email, "miriam@kehilapp.com");

        let wrong = auth
            .login(LoginRequest {
                email: "miriam@kehilapp.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(KehilError::InvalidCredentials)));

        let unknown = auth
            .login(LoginRequest {
                email: "nobody@kehilapp.com".to_string(),
                password: "shalom123".to_string(),
            })
            .await;
        assert!(matches!(unknown, Err(KehilError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_seed_demo_users_is_idempotent() {
        let auth = service();
        let demo = vec![DemoUserConfig {
            name: "Demo".to_string(),
            surname: String::new(),
            email: "demo@kehilapp.com".to_string(),
            password: "demo123".to_string(),
            phone: String::new(),
            is_company: false,
        }];

        assert_eq!(auth.seed_demo_users(&demo).await.unwrap(), 1);
        assert_eq!(auth.seed_demo_users(&demo).await.unwrap(), 0);
        assert_eq!(auth.store().count().await.unwrap(), 1);
    }
}
