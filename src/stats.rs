use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::types::{Headways, Summary};
use crate::config::{Config, Station};

/// One station's result for a run, as printed, charted and written to CSV.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StationSummary {
    pub timestamp: DateTime<Utc>,
    pub route_id: String,
    pub direction_id: u8,
    pub station_id: String,
    pub station: String,

    pub predictions: usize,
    pub headways: usize,

    // minutes; 0.0 when data_available is false
    pub mean_wait: f64,
    pub median_wait: f64,
    pub std_dev: f64,
    pub data_available: bool,

    // why data is missing
    pub no_data_reason: Option<String>,
    pub detail: Option<String>,
}

impl StationSummary {
    /// Builds a record from a station's derived headways and their summary.
    pub fn from_headways(
        timestamp: DateTime<Utc>,
        predictions: usize,
        headways: &Headways,
        summary: Summary,
    ) -> Self {
        let (no_data_reason, detail) = match headways {
            Headways::NoData(reason) => (
                Some(reason.kind().to_string()),
                reason.detail().map(str::to_string),
            ),
            Headways::Empty => (Some("insufficient_predictions".to_string()), None),
            Headways::Values(_) => (None, None),
        };

        StationSummary {
            timestamp,
            predictions,
            headways: headways.values().len(),
            mean_wait: summary.mean,
            median_wait: summary.median,
            std_dev: summary.std_dev,
            data_available: summary.available,
            no_data_reason,
            detail,
            ..Default::default()
        }
    }

    /// Set station and route metadata
    pub fn with_station_info(mut self, config: &Config, station: &Station) -> Self {
        self.route_id = config.route_id.clone();
        self.direction_id = config.direction.id();
        self.station_id = station.id.clone();
        self.station = station.name.clone();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::NoDataReason;

    #[test]
    fn test_from_headways_with_values() {
        let summary = Summary {
            mean: 3.0,
            median: 3.0,
            std_dev: 0.0,
            available: true,
        };
        let record =
            StationSummary::from_headways(Utc::now(), 3, &Headways::Values(vec![3, 3]), summary);

        assert_eq!(record.predictions, 3);
        assert_eq!(record.headways, 2);
        assert_eq!(record.mean_wait, 3.0);
        assert!(record.data_available);
        assert!(record.no_data_reason.is_none());
    }

    #[test]
    fn test_from_headways_no_data() {
        let headways = Headways::NoData(NoDataReason::Transport("timed out".into()));
        let record =
            StationSummary::from_headways(Utc::now(), 0, &headways, Summary::unavailable());

        assert!(!record.data_available);
        assert_eq!(record.mean_wait, 0.0);
        assert_eq!(record.no_data_reason.as_deref(), Some("transport_error"));
        assert_eq!(record.detail.as_deref(), Some("timed out"));
    }

    #[test]
    fn test_from_headways_single_prediction() {
        let record =
            StationSummary::from_headways(Utc::now(), 1, &Headways::Empty, Summary::unavailable());

        assert_eq!(record.headways, 0);
        assert_eq!(
            record.no_data_reason.as_deref(),
            Some("insufficient_predictions")
        );
    }

    #[test]
    fn test_with_station_info() {
        let config = Config::default();
        let station = Station::new("place-kencl", "Kenmore");
        let record = StationSummary::default().with_station_info(&config, &station);

        assert_eq!(record.route_id, "Green-B");
        assert_eq!(record.direction_id, 0);
        assert_eq!(record.station_id, "place-kencl");
        assert_eq!(record.station, "Kenmore");
    }
}
