//! Thin HTTP client for driving the test server.

use serde_json::{json, Value};

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn home(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("home request failed")
    }

    pub async fn submit(&self, text: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/request", self.base_url))
            .json(&json!({ "text": text }))
            .send()
            .await
            .expect("submit request failed")
    }

    /// Submits a request and parses the outcome JSON.
    pub async fn submit_outcome(&self, text: &str) -> Value {
        let response = self.submit(text).await;
        assert!(
            response.status().is_success(),
            "submit returned {}",
            response.status()
        );
        response.json().await.expect("outcome was not JSON")
    }

    pub async fn cache_stats(&self) -> Value {
        self.client
            .get(format!("{}/api/cache/stats", self.base_url))
            .send()
            .await
            .expect("cache stats request failed")
            .json()
            .await
            .expect("cache stats was not JSON")
    }

    pub async fn clear_cache(&self) -> Value {
        self.client
            .post(format!("{}/api/admin/cache/clear", self.base_url))
            .send()
            .await
            .expect("cache clear request failed")
            .json()
            .await
            .expect("cache clear was not JSON")
    }
}
