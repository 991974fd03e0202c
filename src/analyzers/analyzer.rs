use chrono::{DateTime, Utc};
use tracing::{Instrument, debug, error, info, info_span};

use crate::analyzers::aggregate::summarize;
use crate::analyzers::headway::derive_headways;
use crate::analyzers::types::{NoDataReason, Predictions};
use crate::config::{Config, Station, TimeField};
use crate::parser::{extract_minutes, parse_envelope};
use crate::services::prediction_api::{PredictionApi, PredictionQuery};
use crate::stats::StationSummary;

/// Fetches and decodes upcoming arrivals for one stop.
///
/// Failures are logged and returned as [`Predictions::NoData`]; nothing is
/// raised past this point.
pub async fn fetch_predictions<A: PredictionApi + ?Sized>(
    api: &A,
    query: &PredictionQuery,
    field: TimeField,
    now: DateTime<Utc>,
) -> Predictions {
    let bytes = match api.fetch_predictions(query).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "Prediction request failed");
            return Predictions::NoData(NoDataReason::Transport(e.to_string()));
        }
    };
    debug!(bytes = bytes.len(), "Prediction bytes received, parsing");

    let envelope = match parse_envelope(&bytes) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!(error = %e, "Prediction response malformed");
            return Predictions::NoData(NoDataReason::Malformed(e.to_string()));
        }
    };

    let minutes = extract_minutes(&envelope, field, now);
    debug!(
        entries = envelope.data.len(),
        upcoming = minutes.len(),
        "Predictions parsed"
    );

    if minutes.is_empty() {
        Predictions::NoData(NoDataReason::NoPredictions)
    } else {
        Predictions::Minutes(minutes)
    }
}

/// Runs fetch, headway derivation and summary for a single station.
pub async fn analyze_station<A: PredictionApi + ?Sized>(
    api: &A,
    config: &Config,
    station: &Station,
) -> StationSummary {
    let query = PredictionQuery::new(&config.route_id, &station.id, config.direction);
    let now = Utc::now();

    let predictions = fetch_predictions(api, &query, config.time_field, now).await;
    let prediction_count = predictions.len();

    let headways = derive_headways(predictions);
    let summary = summarize(&headways);

    if summary.available {
        info!(
            predictions = prediction_count,
            mean = summary.mean,
            median = summary.median,
            std_dev = summary.std_dev,
            "Station summarized"
        );
    } else {
        info!(predictions = prediction_count, "Station has no usable headways");
    }

    StationSummary::from_headways(now, prediction_count, &headways, summary)
        .with_station_info(config, station)
}

/// Summarizes every configured station, in configured order.
///
/// Stations are fetched one at a time with `config.request_delay` between
/// consecutive requests. A station that fails still gets a record.
pub async fn analyze_all<A: PredictionApi + ?Sized>(api: &A, config: &Config) -> Vec<StationSummary> {
    let mut summaries = Vec::with_capacity(config.stations.len());

    for (i, station) in config.stations.iter().enumerate() {
        if i > 0 && !config.request_delay.is_zero() {
            tokio::time::sleep(config.request_delay).await;
        }

        let span = info_span!(
            "station",
            station_id = %station.id,
            station = %station.name,
        );
        let summary = analyze_station(api, config, station).instrument(span).await;
        summaries.push(summary);
    }

    let available = summaries.iter().filter(|s| s.data_available).count();
    info!(
        stations = summaries.len(),
        available,
        route_id = %config.route_id,
        direction_id = config.direction.id(),
        "Finished processing all stations"
    );

    summaries
}
