/// External API clients module
use crate::errors::{ApiError, ApiResult};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("airtracker/0.1")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// Source of the raw aircraft-state payload.
///
/// The live client implements this; tests substitute fetchers that fail on
/// demand or count invocations.
pub trait FetchStates: Send + Sync {
    fn fetch_states(&self) -> impl Future<Output = ApiResult<Value>> + Send;
}

/// OpenSky /states/all client
pub struct OpenSkyClient {
    http_client: HttpClient,
    base_url: String,
}

impl OpenSkyClient {
    pub fn new(base_url: String, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(timeout)?,
            base_url,
        })
    }
}

impl FetchStates for OpenSkyClient {
    async fn fetch_states(&self) -> ApiResult<Value> {
        debug!("fetching states from {}", self.base_url);
        let resp = self
            .http_client
            .get_client()
            .get(&self.base_url)
            .send()
            .await?;

        // 429 is special-cased: the free tier trips it routinely
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited);
        }
        if !resp.status().is_success() {
            return Err(ApiError::UpstreamStatus(resp.status().as_u16()));
        }

        let json = resp.json().await?;
        Ok(json)
    }
}
