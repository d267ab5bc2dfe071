//! Rate limiting and admin auth tests over HTTP.

use sdk_rust::{OptimizeRequest, OptimizerClient};
use svg_optimizer::OptimizerConfig;

mod common;

fn request() -> OptimizeRequest {
    OptimizeRequest {
        content: "<svg><rect/></svg>".to_string(),
        ..Default::default()
    }
}

fn limited_config(limit: u32) -> OptimizerConfig {
    let mut config = OptimizerConfig::default();
    config.rate_limit.default_limit = limit;
    config
}

#[tokio::test]
async fn test_rate_limit_enforced_with_headers() {
    let (addr, _shutdown) = common::spawn_server(limited_config(3)).await;
    let client = OptimizerClient::new(&common::base_url(addr)).with_api_key("key-a");

    for i in 0..3 {
        let resp = client.optimize_raw(&request()).await.unwrap();
        assert_eq!(resp.status(), 200, "request {i} should be admitted");
        assert_eq!(
            resp.headers()
                .get("x-ratelimit-limit")
                .unwrap()
                .to_str()
                .unwrap(),
            "3"
        );
        let remaining: u32 = resp
            .headers()
            .get("x-ratelimit-remaining")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(remaining, 2 - i);
    }

    let resp = client.optimize_raw(&request()).await.unwrap();
    assert_eq!(resp.status(), 429);

    let retry_after: u64 = resp
        .headers()
        .get("retry-after")
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after <= 60);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["retryAfter"], retry_after);
    assert!(body["error"].as_str().unwrap().contains("rate limit"));
}

#[tokio::test]
async fn test_rate_limit_keys_credentials_independently() {
    let (addr, _shutdown) = common::spawn_server(limited_config(1)).await;
    let url = common::base_url(addr);

    let first = OptimizerClient::new(&url).with_api_key("key-a");
    let second = OptimizerClient::new(&url).with_api_key("key-b");

    assert_eq!(first.optimize_raw(&request()).await.unwrap().status(), 200);
    assert_eq!(first.optimize_raw(&request()).await.unwrap().status(), 429);
    // A different credential still has its own budget.
    assert_eq!(second.optimize_raw(&request()).await.unwrap().status(), 200);
}

#[tokio::test]
async fn test_cache_hits_count_against_the_limit() {
    let (addr, _shutdown) = common::spawn_server(limited_config(2)).await;
    let client = OptimizerClient::new(&common::base_url(addr)).with_api_key("key-a");

    // Identical content: the second request is served from cache but still
    // consumes budget, so the third is rejected.
    assert_eq!(client.optimize_raw(&request()).await.unwrap().status(), 200);
    assert_eq!(client.optimize_raw(&request()).await.unwrap().status(), 200);
    assert_eq!(client.optimize_raw(&request()).await.unwrap().status(), 429);
}

#[tokio::test]
async fn test_override_grants_higher_limit() {
    let mut config = limited_config(1);
    config.rate_limit.overrides = vec![svg_optimizer::config::schema::CredentialLimit {
        credential: "premium".into(),
        limit: 10,
    }];
    let (addr, _shutdown) = common::spawn_server(config).await;
    let client = OptimizerClient::new(&common::base_url(addr)).with_api_key("premium");

    for _ in 0..5 {
        assert_eq!(client.optimize_raw(&request()).await.unwrap().status(), 200);
    }
}

#[tokio::test]
async fn test_admin_requires_bearer_key() {
    let (addr, _shutdown) = common::spawn_server(OptimizerConfig::default()).await;
    let client = OptimizerClient::new(&common::base_url(addr));

    assert!(client.cache_stats("wrong-key").await.is_err());
    assert!(client.cache_stats("admin-secret-key").await.is_ok());

    let raw = reqwest::Client::new()
        .get(format!("{}/admin/status", common::base_url(addr)))
        .send()
        .await
        .unwrap();
    assert_eq!(raw.status(), 401);
}

#[tokio::test]
async fn test_health_is_not_rate_limited() {
    let (addr, _shutdown) = common::spawn_server(limited_config(1)).await;
    let client = OptimizerClient::new(&common::base_url(addr)).with_api_key("key-a");

    assert_eq!(client.optimize_raw(&request()).await.unwrap().status(), 200);
    assert_eq!(client.optimize_raw(&request()).await.unwrap().status(), 429);

    // Probes stay reachable after the credential is exhausted.
    assert!(client.health().await.is_ok());
}
