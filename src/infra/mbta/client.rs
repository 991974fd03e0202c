use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::config::{API_KEY_HEADER, Config};
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, FetchError, HttpClient, fetch_bytes};
use crate::services::prediction_api::{PredictionApi, PredictionQuery};

/// Client for the MBTA V3 `/predictions` endpoint.
pub struct MbtaClient {
    http: Box<dyn HttpClient>,
    base_url: String,
}

impl MbtaClient {
    pub fn new(http: impl HttpClient + 'static, base_url: impl Into<String>) -> Self {
        Self {
            http: Box::new(http),
            base_url: base_url.into(),
        }
    }

    /// Builds a client for `config.base_url`, sending `X-API-Key` when a key is set.
    ///
    /// Requests without a key still work but share the API's anonymous rate limit.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = match &config.api_key {
            Some(key) => Self::new(
                ApiKey::new(BasicClient::new(), API_KEY_HEADER, key)?,
                &config.base_url,
            ),
            None => {
                debug!("No MBTA API key configured, using anonymous access");
                Self::new(BasicClient::new(), &config.base_url)
            }
        };
        Ok(client)
    }
}

#[async_trait]
impl PredictionApi for MbtaClient {
    async fn fetch_predictions(&self, query: &PredictionQuery) -> Result<Vec<u8>, FetchError> {
        debug!(stop_id = %query.stop_id, route_id = %query.route_id, "Requesting predictions");
        fetch_bytes(&*self.http, &self.base_url, &query.query_pairs()).await
    }
}
