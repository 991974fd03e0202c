//! Outcomes passed between the pipeline stages.

/// Why a station produced no predictions at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoDataReason {
    /// The request failed or the API answered with an error status.
    Transport(String),
    /// The body was not a prediction document.
    Malformed(String),
    /// The response was well formed but held no upcoming vehicles.
    NoPredictions,
}

impl NoDataReason {
    /// Short machine-readable label, written to CSV output.
    pub fn kind(&self) -> &'static str {
        match self {
            NoDataReason::Transport(_) => "transport_error",
            NoDataReason::Malformed(_) => "malformed_response",
            NoDataReason::NoPredictions => "no_predictions",
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            NoDataReason::Transport(msg) | NoDataReason::Malformed(msg) => Some(msg),
            NoDataReason::NoPredictions => None,
        }
    }
}

/// Fetcher output for one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predictions {
    NoData(NoDataReason),
    /// Minutes until each upcoming vehicle. The fetcher never builds an
    /// empty list; the deriver treats one as [`NoDataReason::NoPredictions`].
    Minutes(Vec<u32>),
}

impl Predictions {
    pub fn len(&self) -> usize {
        match self {
            Predictions::NoData(_) => 0,
            Predictions::Minutes(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inter-arrival gaps for one station.
///
/// `Empty` and `Values` stay distinct so that a station with a single
/// prediction is never confused with one whose headways are all zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Headways {
    /// The fetch produced nothing.
    NoData(NoDataReason),
    /// Exactly one prediction arrived.
    Empty,
    /// `len(predictions) - 1` gaps, in minutes.
    Values(Vec<u32>),
}

impl Headways {
    pub fn values(&self) -> &[u32] {
        match self {
            Headways::Values(v) => v,
            _ => &[],
        }
    }
}

/// Mean, median and population standard deviation of a station's headways.
///
/// When `available` is false all three are the `0.0` sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub available: bool,
}

impl Summary {
    pub fn unavailable() -> Self {
        Self {
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            available: false,
        }
    }
}
