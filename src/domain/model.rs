use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 儲存層中的使用者；含密碼雜湊，不可直接回傳給用戶端
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub is_company: bool,
    pub created_at: DateTime<Utc>,
}

/// 尚未寫入儲存層的使用者（id 由儲存層指派）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub is_company: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: u64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub is_company: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            surname: user.surname.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            is_company: user.is_company,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub is_company: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user: Option<PublicUser>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl AuthResponse {
    pub fn ok(user: PublicUser) -> Self {
        Self {
            success: true,
            user: Some(user),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            user: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// 伺服器啟動後經過的秒數
    pub uptime: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub success: bool,
    pub message: String,
    pub requested_url: String,
    pub available_endpoints: Vec<String>,
}

/// 單一候選 URL 的探測結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub url: String,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_never_serializes_password() {
        let user = User {
            id: 7,
            name: "Sara".to_string(),
            surname: "Levi".to_string(),
            email: "sara@kehilapp.com".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            phone: "555-0101".to_string(),
            is_company: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(PublicUser::from(&user)).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("passwordHash"));
        assert_eq!(obj["isCompany"], serde_json::Value::Bool(true));
        assert_eq!(obj["email"], "sara@kehilapp.com");
    }

    #[test]
    fn test_register_request_accepts_camel_case_and_missing_fields() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Dan",
            "email": "dan@kehilapp.com",
            "password": "secret1",
            "isCompany": true
        }))
        .unwrap();

        assert_eq!(req.name, "Dan");
        assert!(req.is_company);
        assert_eq!(req.surname, "");
        assert_eq!(req.phone, "");
    }

    #[test]
    fn test_auth_failure_omits_user() {
        let json = serde_json::to_value(AuthResponse::failure("Email already registered")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "message": "Email already registered"})
        );
    }
}
