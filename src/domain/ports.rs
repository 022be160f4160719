use crate::domain::model::{NewUser, User};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 使用者儲存層
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 以 email 查詢（比對前會先正規化）
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// 新增使用者；email 已存在時回傳 `KehilError::DuplicateEmail`
    async fn insert(&self, user: NewUser) -> Result<User>;

    async fn count(&self) -> Result<usize>;
}

/// 對單一 base URL 做健康檢查
pub trait HealthCheck: Send + Sync {
    fn check(&self, base_url: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}
