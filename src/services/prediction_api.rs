//! Trait and types for a source of arrival predictions.

use async_trait::async_trait;

use crate::config::Direction;
use crate::fetch::FetchError;

/// Filters for one prediction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionQuery {
    pub route_id: String,
    pub stop_id: String,
    pub direction: Direction,
}

impl PredictionQuery {
    pub fn new(route_id: impl Into<String>, stop_id: impl Into<String>, direction: Direction) -> Self {
        Self {
            route_id: route_id.into(),
            stop_id: stop_id.into(),
            direction,
        }
    }

    /// JSON:API filter parameters understood by `/predictions`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("filter[route]", self.route_id.clone()),
            ("filter[stop]", self.stop_id.clone()),
            ("filter[direction_id]", self.direction.id().to_string()),
        ]
    }
}

/// Abstraction over a prediction provider (e.g., the MBTA V3 API).
#[async_trait]
pub trait PredictionApi: Send + Sync {
    /// Returns the raw response body for the predictions matching `query`.
    async fn fetch_predictions(&self, query: &PredictionQuery) -> Result<Vec<u8>, FetchError>;
}
