use crate::config::{CandidateTable, Platform};
use crate::domain::model::ProbeReport;
use crate::domain::ports::HealthCheck;
use crate::utils::error::{KehilError, Result};
use std::time::Instant;

/// 依序探測候選 URL，回傳第一個健康檢查成功的位址
///
/// 每個候選只試一次，不做並行探測；最壞情況的延遲為各候選逾時的總和。
pub struct Prober<H: HealthCheck> {
    health: H,
    table: CandidateTable,
}

impl<H: HealthCheck> Prober<H> {
    pub fn new(health: H, table: CandidateTable) -> Self {
        Self { health, table }
    }

    pub fn table(&self) -> &CandidateTable {
        &self.table
    }

    pub async fn probe(&self, candidates: &[String]) -> Result<String> {
        if candidates.is_empty() {
            tracing::warn!("❌ No candidate URLs to probe");
            return Err(KehilError::NoReachableEndpoint { attempted: 0 });
        }

        for (index, url) in candidates.iter().enumerate() {
            tracing::debug!("🔍 Probing {}/{}: {}", index + 1, candidates.len(), url);

            match self.health.check(url).await {
                Ok(()) => {
                    tracing::info!("✅ Connected to {}", url);
                    return Ok(url.clone());
                }
                Err(e) if e.is_unreachable() => {
                    tracing::debug!("❌ {} unreachable: {}", url, e);
                }
                Err(e) => {
                    tracing::debug!("⚠️ {} answered but is not healthy: {}", url, e);
                }
            }
        }

        Err(KehilError::NoReachableEndpoint {
            attempted: candidates.len(),
        })
    }

    /// 探測平台的候選清單；全部失敗時退回該平台的預設 URL
    pub async fn discover(&self, platform: Platform) -> String {
        match self.probe(self.table.candidates(platform)).await {
            Ok(url) => url,
            Err(e) => {
                let fallback = self.table.fallback(platform).to_string();
                tracing::warn!(
                    "⚠️ Endpoint discovery for {} failed ({}), using default {}",
                    platform,
                    e,
                    fallback
                );
                fallback
            }
        }
    }

    /// 逐一探測所有候選，不在第一個成功時停止
    pub async fn survey(&self, candidates: &[String]) -> Vec<ProbeReport> {
        let mut reports = Vec::with_capacity(candidates.len());

        for url in candidates {
            let started = Instant::now();
            let outcome = self.health.check(url).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let report = match outcome {
                Ok(()) => ProbeReport {
                    url: url.clone(),
                    reachable: true,
                    error: None,
                    elapsed_ms,
                },
                Err(e) => ProbeReport {
                    url: url.clone(),
                    reachable: false,
                    error: Some(e.user_friendly_message()),
                    elapsed_ms,
                },
            };
            reports.push(report);
        }

        let reachable = reports.iter().filter(|r| r.reachable).count();
        tracing::info!("📊 {}/{} candidate(s) reachable", reachable, reports.len());
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    /// 記錄呼叫順序的健康檢查替身
    #[derive(Clone, Default)]
    struct RecordingHealth {
        reachable: HashSet<String>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingHealth {
        fn reachable(urls: &[&str]) -> Self {
            Self {
                reachable: urls.iter().map(|u| u.to_string()).collect(),
                calls: Arc::default(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl HealthCheck for RecordingHealth {
        async fn check(&self, base_url: &str) -> Result<()> {
            self.calls.lock().unwrap().push(base_url.to_string());
            if self.reachable.contains(base_url) {
                Ok(())
            } else {
                Err(KehilError::NetworkUnavailable {
                    url: base_url.to_string(),
                    hint: "refused".to_string(),
                })
            }
        }
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn table() -> CandidateTable {
        CandidateTable::development(&NetworkConfig::default())
    }

    #[tokio::test]
    async fn test_probe_returns_nth_and_attempts_in_order() {
        let health = RecordingHealth::reachable(&["http://c/api"]);
        let prober = Prober::new(health.clone(), table());
        let candidates = urls(&["http://a/api", "http://b/api", "http://c/api", "http://d/api"]);

        let chosen = prober.probe(&candidates).await.unwrap();

        assert_eq!(chosen, "http://c/api");
        assert_eq!(health.calls(), urls(&["http://a/api", "http://b/api", "http://c/api"]));
    }

    #[tokio::test]
    async fn test_empty_candidates_fail_without_network() {
        let health = RecordingHealth::default();
        let prober = Prober::new(health.clone(), table());

        let result = prober.probe(&[]).await;

        assert!(matches!(
            result,
            Err(KehilError::NoReachableEndpoint { attempted: 0 })
        ));
        assert!(health.calls().is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_are_probed_each_time() {
        let health = RecordingHealth::default();
        let prober = Prober::new(health.clone(), table());
        let candidates = urls(&["http://a/api", "http://a/api"]);

        let result = prober.probe(&candidates).await;

        assert!(matches!(
            result,
            Err(KehilError::NoReachableEndpoint { attempted: 2 })
        ));
        assert_eq!(health.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_discover_falls_back_to_platform_default() {
        let health = RecordingHealth::default();
        let prober = Prober::new(health.clone(), table());

        let url = prober.discover(Platform::Android).await;

        assert_eq!(url, "http://10.0.2.2:3001/api");
        assert_eq!(health.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_discover_prefers_reachable_candidate() {
        let health = RecordingHealth::reachable(&["http://127.0.0.1:3001/api"]);
        let prober = Prober::new(health, table());

        assert_eq!(
            prober.discover(Platform::Ios).await,
            "http://127.0.0.1:3001/api"
        );
    }

    #[tokio::test]
    async fn test_survey_reports_every_candidate() {
        let health = RecordingHealth::reachable(&["http://a/api", "http://c/api"]);
        let prober = Prober::new(health.clone(), table());
        let candidates = urls(&["http://a/api", "http://b/api", "http://c/api"]);

        let reports = prober.survey(&candidates).await;

        assert_eq!(reports.len(), 3);
        assert!(reports[0].reachable);
        assert!(!reports[1].reachable);
        assert!(reports[1].error.is_some());
        assert!(reports[2].reachable);
        assert_eq!(health.calls(), candidates);
    }
}
