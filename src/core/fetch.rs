use crate::config::NetworkConfig;
use crate::domain::ports::HealthCheck;
use crate::utils::error::{KehilError, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// 帶逾時保護的 HTTP 呼叫
///
/// 每次呼叫都以 `request_timeout_ms` 為期限：期限一到，進行中的請求會被取消
/// 並回傳 `KehilError::Timeout`；非 2xx 回應轉為 `HttpStatus`；連線層級失敗轉為
/// `NetworkUnavailable`。本身不做重試。
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    timeout: Duration,
    server_port: u16,
}

impl FetchClient {
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            timeout: network.request_timeout(),
            server_port: network.server_port,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// 送出請求並檢查狀態碼，期限涵蓋連線到收到標頭為止
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build()?;
        let url = request.url().to_string();

        tracing::debug!("📤 {} {}", request.method(), url);
        self.guarded(&url, self.execute_checked(request, &url)).await
    }

    /// GET 並將回應內容解析為 JSON
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.fetch_json(self.get(url)).await
    }

    /// POST JSON 並將回應內容解析為 JSON
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch_json(self.post(url).json(body)).await
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = request.build()?;
        let url = request.url().to_string();

        tracing::debug!("📤 {} {}", request.method(), url);
        self.guarded(&url, async {
            let response = self.execute_checked(request, &url).await?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| self.classify(&url, e))?;
            Ok(serde_json::from_slice(&bytes)?)
        })
        .await
    }

    async fn execute_checked(&self, request: reqwest::Request, url: &str) -> Result<Response> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("✅ {} responded {}", url, status);
            return Ok(response);
        }

        // 錯誤回應若為 JSON 且帶有 message，一併保留給呼叫端
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("message")?.as_str().map(str::to_string));

        tracing::debug!("⚠️ {} responded {}", url, status);
        Err(KehilError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    /// 逾時時 future 會被丟棄，底層請求與計時器隨之釋放
    async fn guarded<T, F>(&self, url: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("⏰ Timeout after {:?} waiting for {}", self.timeout, url);
                Err(self.timeout_error(url))
            }
        }
    }

    fn timeout_error(&self, url: &str) -> KehilError {
        KehilError::Timeout {
            url: url.to_string(),
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }

    fn classify(&self, url: &str, error: reqwest::Error) -> KehilError {
        if error.is_timeout() {
            self.timeout_error(url)
        } else if error.is_connect() || error.is_request() {
            tracing::debug!("🌐 Transport failure for {}: {}", url, error);
            KehilError::NetworkUnavailable {
                url: url.to_string(),
                hint: format!(
                    "check that the server is running on port {} and reachable from this device",
                    self.server_port
                ),
            }
        } else {
            KehilError::ApiError(error)
        }
    }
}

impl HealthCheck for FetchClient {
    async fn check(&self, base_url: &str) -> Result<()> {
        self.send(self.get(&health_url(base_url))).await.map(|_| ())
    }
}

/// `<base_url>/health`，base URL 結尾的 `/` 會先去除
pub fn health_url(base_url: &str) -> String {
    format!("{}/health", base_url.trim_end_matches('/'))
}
