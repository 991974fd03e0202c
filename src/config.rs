//! Run configuration: route, direction, stations and API access.
//!
//! Everything the pipeline needs is carried in an explicit [`Config`] value
//! that is passed into each call.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base URL for the MBTA V3 predictions endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api-v3.mbta.com/predictions";

/// Green Line B branch.
pub const DEFAULT_ROUTE_ID: &str = "Green-B";

/// Pause between consecutive prediction requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1500);

/// Header the MBTA API reads the key from.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Green Line B stops, ordered from Government Center out to Boston College.
static GREEN_LINE_B: &[(&str, &str)] = &[
    ("place-gover", "Government Center"),
    ("place-pktrm", "Park Street"),
    ("place-boyls", "Boylston"),
    ("place-armnl", "Arlington"),
    ("place-coecl", "Copley"),
    ("place-hymnl", "Hynes Convention Center"),
    ("place-kencl", "Kenmore"),
    ("place-bland", "Blandford Street"),
    ("place-buest", "Boston University East"),
    ("place-bucen", "Boston University Central"),
    ("place-amory", "Amory Street"),
    ("place-babck", "Babcock Street"),
    ("place-brico", "Packards Corner"),
    ("place-harvd", "Harvard Avenue"),
    ("place-grigg", "Griggs Street"),
    ("place-alsgr", "Allston Street"),
    ("place-wrnst", "Warren Street"),
    ("place-wascm", "Washington Street"),
    ("place-sthld", "Sutherland Road"),
    ("place-chswk", "Chiswick Road"),
    ("place-chill", "Chestnut Hill Avenue"),
    ("place-sougr", "South Street"),
    ("place-lake", "Boston College"),
];

/// A transit stop: opaque API id plus the name shown to people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Travel direction along a route, as the API's `direction_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// `direction_id = 0` (toward Boston College on the B branch).
    #[default]
    Zero,
    /// `direction_id = 1` (toward Government Center on the B branch).
    One,
}

impl Direction {
    pub fn id(self) -> u8 {
        match self {
            Direction::Zero => 0,
            Direction::One => 1,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Direction::Zero),
            1 => Ok(Direction::One),
            other => bail!("direction must be 0 or 1, got {other}"),
        }
    }
}

/// Which prediction attribute is read as the vehicle's time at the stop.
///
/// The other attribute is used when the preferred one is null, since the API
/// omits arrivals at a trip's first stop and departures at its last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeField {
    #[default]
    Arrival,
    Departure,
}

/// Loads the ordered station list.
///
/// Stored as a JSON array on disk so that order is preserved:
/// ```json
/// [
///   { "id": "place-gover", "name": "Government Center" },
///   { "id": "place-pktrm", "name": "Park Street" }
/// ]
/// ```
pub fn load_stations(path: &str) -> Result<Vec<Station>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading station file '{path}'"))?;
    let stations: Vec<Station> = serde_json::from_str(&content)
        .with_context(|| format!("parsing station file '{path}'"))?;

    if stations.is_empty() {
        bail!("station file '{path}' lists no stations");
    }

    Ok(stations)
}

/// The built-in Green Line B station list.
pub fn green_line_b() -> Vec<Station> {
    GREEN_LINE_B
        .iter()
        .map(|(id, name)| Station::new(*id, *name))
        .collect()
}

/// Everything one run of the pipeline needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub route_id: String,
    pub direction: Direction,
    pub stations: Vec<Station>,
    pub request_delay: Duration,
    pub time_field: TimeField,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            route_id: DEFAULT_ROUTE_ID.to_string(),
            direction: Direction::default(),
            stations: green_line_b(),
            request_delay: DEFAULT_REQUEST_DELAY,
            time_field: TimeField::default(),
        }
    }
}

impl Config {
    /// Reads `MBTA_API_KEY` and `MBTA_API_URL` on top of the defaults.
    ///
    /// An empty key is treated as no key.
    pub fn from_env() -> Self {
        let api_key = std::env::var("MBTA_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let base_url =
            std::env::var("MBTA_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self {
            api_key,
            base_url,
            ..Default::default()
        }
    }

    pub fn with_route(mut self, route_id: impl Into<String>) -> Self {
        self.route_id = route_id.into();
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_stations(mut self, stations: Vec<Station>) -> Self {
        self.stations = stations;
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_time_field(mut self, field: TimeField) -> Self {
        self.time_field = field;
        self
    }
}
