use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use headway_rater::analyzers::aggregate::summarize;
use headway_rater::analyzers::analyzer::analyze_all;
use headway_rater::analyzers::headway::derive_headways;
use headway_rater::analyzers::types::{Headways, Predictions};
use headway_rater::config::{API_KEY_HEADER, Config, Station, TimeField};
use headway_rater::fetch::HttpClient;
use headway_rater::fetch::auth::ApiKey;
use headway_rater::infra::mbta::MbtaClient;
use headway_rater::output::summary_line;
use headway_rater::parser::{extract_minutes, parse_envelope};
use std::sync::{Arc, Mutex};

#[test]
fn test_full_pipeline_from_fixture() {
    let bytes = include_bytes!("fixtures/predictions_park_street.json");
    let now = DateTime::parse_from_rfc3339("2024-05-14T08:00:00-04:00")
        .unwrap()
        .with_timezone(&Utc);

    let envelope = parse_envelope(bytes).expect("Failed to parse fixture");
    let minutes = extract_minutes(&envelope, TimeField::Arrival, now);
    assert_eq!(minutes, vec![3, 9, 14, 21]);

    let headways = derive_headways(Predictions::Minutes(minutes));
    assert_eq!(headways, Headways::Values(vec![6, 5, 7]));

    let summary = summarize(&headways);
    assert_eq!(summary.mean, 6.0);
    assert_eq!(summary.median, 6.0);
    assert!((summary.std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
}

/// Serves predictions relative to the current time for the stops it knows,
/// and a 500 for everything else.
struct FakeMbta {
    known: Vec<(&'static str, Vec<i64>)>,
    keys_seen: Arc<Mutex<Vec<Option<String>>>>,
}

#[async_trait]
impl HttpClient for FakeMbta {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let key = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.keys_seen.lock().unwrap().push(key);

        let stop = req
            .url()
            .query_pairs()
            .find(|(k, _)| k == "filter[stop]")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();

        let resp = match self.known.iter().find(|(id, _)| *id == stop) {
            Some((_, offsets)) => {
                let now = Utc::now();
                let entries: Vec<String> = offsets
                    .iter()
                    .map(|m| {
                        let at = (now + Duration::minutes(*m)).to_rfc3339();
                        format!(r#"{{"type": "prediction", "attributes": {{"arrival_time": "{at}"}}}}"#)
                    })
                    .collect();
                http::Response::builder()
                    .status(200)
                    .body(format!(r#"{{"data": [{}]}}"#, entries.join(",")))
                    .unwrap()
            }
            None => http::Response::builder()
                .status(500)
                .body(String::from("upstream error"))
                .unwrap(),
        };
        Ok(reqwest::Response::from(resp))
    }
}

#[tokio::test]
async fn test_run_over_stations_with_api_key() {
    let keys_seen = Arc::new(Mutex::new(Vec::new()));
    let fake = FakeMbta {
        known: vec![
            ("place-gover", vec![10, 4, 7]),
            ("place-boyls", vec![3]),
        ],
        keys_seen: keys_seen.clone(),
    };
    let http = ApiKey::new(fake, API_KEY_HEADER, "test-key").unwrap();
    let client = MbtaClient::new(http, "https://api-v3.mbta.com/predictions");

    let config = Config::default()
        .with_request_delay(std::time::Duration::ZERO)
        .with_stations(vec![
            Station::new("place-gover", "Government Center"),
            Station::new("place-pktrm", "Park Street"),
            Station::new("place-boyls", "Boylston"),
        ]);

    let summaries = analyze_all(&client, &config).await;

    assert_eq!(summaries.len(), 3);
    assert_eq!(
        summary_line(&summaries[0]),
        "Government Center Mean wait time: 3.00 Minutes, Median wait time: 3.00 Minutes, Standard Deviation: 0.00"
    );
    assert_eq!(
        summary_line(&summaries[1]),
        "No valid wait time data (fewer than 2 predictions) for Park Street."
    );
    assert!(!summaries[1].data_available);
    assert_eq!(summaries[1].no_data_reason.as_deref(), Some("transport_error"));
    assert!(!summaries[2].data_available);
    assert_eq!(summaries[2].predictions, 1);

    let keys = keys_seen.lock().unwrap();
    assert_eq!(keys.len(), 3);
    assert!(keys.iter().all(|k| k.as_deref() == Some("test-key")));
}
