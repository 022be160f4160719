use crate::core::fetch::{health_url, FetchClient};
use crate::domain::model::{AuthResponse, HealthStatus, LoginRequest, PublicUser, RegisterRequest};
use crate::utils::error::{KehilError, Result};

/// 綁定單一 base URL 的後端用戶端
#[derive(Debug, Clone)]
pub struct KehilClient {
    base_url: String,
    fetch: FetchClient,
}

impl KehilClient {
    pub fn new(base_url: impl Into<String>, fetch: FetchClient) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            fetch,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.fetch.get_json(&health_url(&self.base_url)).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<PublicUser> {
        let url = format!("{}/register", self.base_url);
        let response = self.fetch.post_json(&url, request).await;
        into_user(response, &request.email)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<PublicUser> {
        let url = format!("{}/login", self.base_url);
        let response = self.fetch.post_json(&url, request).await;
        into_user(response, &request.email)
    }
}

fn into_user(response: Result<AuthResponse>, email: &str) -> Result<PublicUser> {
    match response {
        Ok(AuthResponse {
            success: true,
            user: Some(user),
            ..
        }) => Ok(user),
        Ok(AuthResponse { message, .. }) => Err(KehilError::ValidationError {
            message: message.unwrap_or_else(|| "Request was not successful".to_string()),
        }),
        Err(KehilError::HttpStatus { status: 409, .. }) => Err(KehilError::DuplicateEmail {
            email: email.to_string(),
        }),
        Err(KehilError::HttpStatus { status: 401, .. }) => Err(KehilError::InvalidCredentials),
        Err(KehilError::HttpStatus {
            status: 400,
            message: Some(message),
            ..
        }) => Err(KehilError::ValidationError { message }),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use httpmock::prelude::*;

    fn fetch() -> FetchClient {
        FetchClient::new(&NetworkConfig {
            server_port: 3001,
            request_timeout_ms: 2_000,
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_drops_trailing_slash() {
        let client = KehilClient::new("http://10.0.2.2:3001/api/".to_string(), fetch());
        assert_eq!(client.base_url(), "http://10.0.2.2:3001/api");
    }

    #[tokio::test]
    async fn test_login_returns_user() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/login")
                    .json_body(serde_json::json!({"email": "a@kehilapp.com", "password": "pw"}));
                then.status(200).json_body(serde_json::json!({
                    "success": true,
                    "user": {
                        "id": 1,
                        "name": "Avi",
                        "surname": "Ben",
                        "email": "a@kehilapp.com",
                        "phone": "",
                        "isCompany": false,
                        "createdAt": "2026-01-01T00:00:00Z"
                    }
                }));
            })
            .await;

        let client = KehilClient::new(server.url("/api/"), fetch());
        let user = client
            .login(&LoginRequest {
                email: "a@kehilapp.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.name, "Avi");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_conflict_maps_to_duplicate_email() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/register");
                then.status(409).json_body(serde_json::json!({
                    "success": false,
                    "message": "Email already registered"
                }));
            })
            .await;

        let client = KehilClient::new(server.url("/api"), fetch());
        let result = client
            .register(&RegisterRequest {
                name: "Avi".to_string(),
                email: "a@kehilapp.com".to_string(),
                password: "pw123456".to_string(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(KehilError::DuplicateEmail { .. })));
    }

    #[tokio::test]
    async fn test_unsuccessful_body_surfaces_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/login");
                then.status(200)
                    .json_body(serde_json::json!({"success": false, "message": "Cuenta bloqueada"}));
            })
            .await;

        let client = KehilClient::new(server.url("/api"), fetch());
        let result = client.login(&LoginRequest::default()).await;

        match result {
            Err(KehilError::ValidationError { message }) => assert_eq!(message, "Cuenta bloqueada"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
