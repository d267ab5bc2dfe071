use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camel_case: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationStats {
    pub original_size: usize,
    pub optimized_size: usize,
    pub saved_bytes: i64,
    pub saved_percent: String,
    pub ratio: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub success: bool,
    pub filename: String,
    pub optimization: OptimizationStats,
    pub camel_case_applied: bool,
    pub sanitized: bool,
    #[serde(default)]
    pub security_warnings: Vec<String>,
    pub result: String,
}

pub struct OptimizerClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OptimizerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            api_key: None,
        }
    }

    /// Attach an API key sent as X-Api-Key on optimize requests.
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    /// Optimize one document. Non-2xx responses are returned as errors
    /// carrying the service's error body.
    pub async fn optimize(
        &self,
        req: OptimizeRequest,
    ) -> Result<OptimizeResponse, Box<dyn std::error::Error>> {
        let mut builder = self
            .client
            .post(format!("{}/api/optimize", self.base_url))
            .json(&req);
        if let Some(key) = &self.api_key {
            builder = builder.header("X-Api-Key", key);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(format!("service returned status {}: {}", status, text).into());
        }

        Ok(serde_json::from_str::<OptimizeResponse>(&text)?)
    }

    /// Raw optimize call, for callers that need status and headers.
    pub async fn optimize_raw(&self, req: &OptimizeRequest) -> Result<Response, reqwest::Error> {
        let mut builder = self
            .client
            .post(format!("{}/api/optimize", self.base_url))
            .json(req);
        if let Some(key) = &self.api_key {
            builder = builder.header("X-Api-Key", key);
        }
        builder.send().await
    }

    /// Service health probe.
    pub async fn health(&self) -> Result<Value, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.json().await?)
    }

    /// Aggregate cache counters from the admin surface.
    pub async fn cache_stats(
        &self,
        admin_key: &str,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/admin/cache", self.base_url))
            .header("Authorization", format!("Bearer {}", admin_key))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("admin API returned status {}", status).into());
        }
        Ok(resp.json().await?)
    }
}
